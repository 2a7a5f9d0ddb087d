use std::collections::BTreeMap;

use log::{debug, info, warn};
use snafu::prelude::*;

use crate::config::*;
use crate::parser::parse_division;

/// All the divisions known to the program, keyed by division number.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct VotingHistory {
    divisions: BTreeMap<u32, Division>,
}

impl VotingHistory {
    pub fn new() -> VotingHistory {
        VotingHistory {
            divisions: BTreeMap::new(),
        }
    }

    /// Builds a history from named division records.
    ///
    /// The records are processed in the order of their names. When two records
    /// describe the same division, the one that comes last wins.
    pub fn from_sources(
        sources: &[(String, String)],
        policy: MalformedPolicy,
    ) -> Result<VotingHistory, HistoryError> {
        let mut sorted: Vec<&(String, String)> = sources.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut history = VotingHistory::new();
        for (name, content) in sorted {
            match parse_division(content) {
                Ok(division) => {
                    debug!(
                        "from_sources: {} -> division {}",
                        name, division.division_nr
                    );
                    history.insert(division);
                }
                Err(e) if policy == MalformedPolicy::Skip => {
                    warn!("Skipping malformed division record {}: {}", name, e);
                }
                Err(e) => {
                    return Err(e).context(MalformedSourceSnafu { name: name.clone() });
                }
            }
        }
        info!(
            "Loaded {} divisions from {} records",
            history.len(),
            sources.len()
        );
        Ok(history)
    }

    /// Adds a division, replacing any previous division with the same number.
    pub fn insert(&mut self, division: Division) -> Option<Division> {
        let nr = division.division_nr;
        let previous = self.divisions.insert(nr, division);
        if previous.is_some() {
            debug!("insert: division {} replaced by a later record", nr);
        }
        previous
    }

    pub fn get(&self, division_nr: u32) -> Option<&Division> {
        self.divisions.get(&division_nr)
    }

    pub fn divisions(&self) -> &BTreeMap<u32, Division> {
        &self.divisions
    }

    pub fn len(&self) -> usize {
        self.divisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.divisions.is_empty()
    }

    /// The menu of divisions that can be selected, by division number.
    pub fn selection_options(&self) -> Vec<SelectionOption> {
        self.divisions
            .values()
            .map(|d| SelectionOption {
                label: d.title.clone(),
                value: d.division_nr,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::{record, row};

    fn sources() -> Vec<(String, String)> {
        let r1 = row("A", "Labour", "Aye");
        let r2 = row("B", "Conservative", "No");
        vec![
            (
                "0002.csv".to_string(),
                record(2, "02/01/2019", "Second", 0, 1, &[r2.as_str()]),
            ),
            (
                "0001.csv".to_string(),
                record(1, "01/01/2019", "First", 1, 0, &[r1.as_str()]),
            ),
        ]
    }

    #[test]
    fn loads_all_sources() {
        let h = VotingHistory::from_sources(&sources(), MalformedPolicy::Abort).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.get(1).unwrap().title, "First");
        assert_eq!(
            h.selection_options(),
            vec![
                SelectionOption {
                    label: "First".to_string(),
                    value: 1
                },
                SelectionOption {
                    label: "Second".to_string(),
                    value: 2
                },
            ]
        );
    }

    #[test]
    fn later_file_wins() {
        let mut srcs = sources();
        srcs.push((
            "0003.csv".to_string(),
            record(1, "05/01/2019", "First, again", 3, 0, &[]),
        ));
        // Given out of order on purpose: the file name decides.
        srcs.swap(0, 2);
        let h = VotingHistory::from_sources(&srcs, MalformedPolicy::Abort).unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h.get(1).unwrap().title, "First, again");
        assert_eq!(h.get(1).unwrap().aye_count, 3);
    }

    #[test]
    fn malformed_source_policy() {
        let mut srcs = sources();
        srcs.push(("0000.csv".to_string(), "not a division".to_string()));

        match VotingHistory::from_sources(&srcs, MalformedPolicy::Abort) {
            Err(HistoryError::MalformedSource { name, .. }) => assert_eq!(name, "0000.csv"),
            x => panic!("unexpected result {:?}", x),
        }

        let h = VotingHistory::from_sources(&srcs, MalformedPolicy::Skip).unwrap();
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn loading_twice_gives_same_history() {
        let h1 = VotingHistory::from_sources(&sources(), MalformedPolicy::Abort).unwrap();
        let h2 = VotingHistory::from_sources(&sources(), MalformedPolicy::Abort).unwrap();
        assert_eq!(h1, h2);
    }
}
