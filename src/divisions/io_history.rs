// Reading a directory of division records.

use std::fs;
use std::path::Path;

use crate::divisions::*;

/// Loads every regular file of a directory into a history.
///
/// Files that are not valid text count as malformed records.
pub fn read_history(dir: &Path, policy: MalformedPolicy) -> DivnetResult<VotingHistory> {
    let dir_name = dir.display().to_string();
    let entries = fs::read_dir(dir).context(ReadingDirSnafu {
        path: dir_name.clone(),
    })?;
    let mut sources: Vec<(String, String)> = Vec::new();
    for entry_r in entries {
        let entry = entry_r.context(ReadingDirSnafu {
            path: dir_name.clone(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            debug!("read_history: skipping {:?}", path);
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match fs::read_to_string(&path) {
            Ok(content) => sources.push((name, content)),
            Err(e) if policy == MalformedPolicy::Skip => {
                warn!("Skipping unreadable division record {}: {}", name, e);
            }
            Err(e) => {
                return Err(e).context(OpeningFileSnafu {
                    path: path.display().to_string(),
                });
            }
        }
    }
    info!("Read {} files from {}", sources.len(), dir_name);
    VotingHistory::from_sources(&sources, policy).context(HistorySnafu {})
}
