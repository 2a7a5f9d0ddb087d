// Downloading the division records from the Commons votes portal.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::divisions::*;

pub const DEFAULT_HOST: &str = "commonsvotes.digiminster.com";

/// The portal numbers its divisions from 0.
pub const FIRST_DIVISION: u32 = 0;

lazy_static! {
    static ref DIVISION_LINK: Regex = Regex::new(r#"href="/Divisions/Details/([0-9]+)""#).unwrap();
}

/// Where the record of a division is stored.
pub fn division_csv_path(dir: &Path, division_nr: u32) -> PathBuf {
    dir.join(format!("{:04}.csv", division_nr))
}

/// A host name is reached over https, a full url is used as given.
pub fn base_url(host: &str) -> String {
    let h = host.trim_end_matches('/');
    if h.starts_with("http://") || h.starts_with("https://") {
        h.to_string()
    } else {
        format!("https://{}", h)
    }
}

fn download_url(base: &str, division_nr: u32) -> String {
    format!("{}/Divisions/DownloadCSV/{}", base, division_nr)
}

/// The number of the most recent division linked from the front page.
pub fn latest_division_in(html: &str) -> DivnetResult<u32> {
    let caps = DIVISION_LINK
        .captures(html)
        .whatever_context::<_, DivnetError>("no division link found on the front page")?;
    caps[1]
        .parse::<u32>()
        .whatever_context("division number out of range")
}

/// What happened to each division number of a download.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FetchSummary {
    pub stored: Vec<u32>,
    pub present: usize,
    pub missing: Vec<u32>,
    pub failed: Vec<u32>,
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stored, {} already present, {} missing, {} failed",
            self.stored.len(),
            self.present,
            self.missing.len(),
            self.failed.len()
        )
    }
}

pub fn make_client() -> DivnetResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context(HttpSnafu {})
}

pub fn fetch_latest_division(client: &Client, host: &str) -> DivnetResult<u32> {
    let url = format!("{}/", base_url(host));
    info!("Reading the latest division from {}", url);
    let html = client
        .get(&url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.text())
        .context(HttpSnafu {})?;
    latest_division_in(&html)
}

enum Outcome {
    Stored,
    Missing(StatusCode),
}

fn fetch_one(client: &Client, url: &str, path: &Path) -> DivnetResult<Outcome> {
    let head = client.head(url).send().context(HttpSnafu {})?;
    if head.status() != StatusCode::OK {
        return Ok(Outcome::Missing(head.status()));
    }
    let body = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .context(HttpSnafu {})?;
    fs::write(path, &body).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })?;
    Ok(Outcome::Stored)
}

/// Downloads the records `first..=last` that are not in `dir` yet.
///
/// Requests are made one after the other. A division that the portal does
/// not serve, or a failed request, is logged and the loop goes on. Failing
/// to write a file stops the download.
pub fn fetch_divisions(
    client: &Client,
    host: &str,
    dir: &Path,
    first: u32,
    last: u32,
) -> DivnetResult<FetchSummary> {
    fs::create_dir_all(dir).context(WritingOutputSnafu {
        path: dir.display().to_string(),
    })?;
    let base = base_url(host);
    let mut summary = FetchSummary::default();
    for division_nr in first..=last {
        let path = division_csv_path(dir, division_nr);
        if path.exists() {
            debug!("fetch_divisions: {:?} already present", path);
            summary.present += 1;
            continue;
        }
        let url = download_url(&base, division_nr);
        match fetch_one(client, &url, &path) {
            Ok(Outcome::Stored) => {
                info!("File stored as {}", path.display());
                summary.stored.push(division_nr);
            }
            Ok(Outcome::Missing(status)) => {
                info!("Division {}: {}", division_nr, status);
                summary.missing.push(division_nr);
            }
            Err(DivnetError::Http { source }) => {
                warn!("Division {}: request failed: {}", division_nr, source);
                summary.failed.push(division_nr);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(summary)
}
