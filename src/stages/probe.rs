//! Stage 2: HTTP probing and status classification.
//!
//! Runs httpx once over the enumerated subdomains and buckets each probed
//! URL by the status marker httpx prints after it. Only three buckets
//! reach disk (200, 403/404, 5xx); every other status is parsed but
//! dropped, and malformed lines are discarded silently.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::logger::RunLogger;
use crate::output::{
    OutputLayout, STATUS_CLIENT_GONE_FILE, STATUS_OK_FILE, STATUS_SERVER_ERROR_FILE,
};
use crate::runner::ToolRunner;

/// Typed view of the bracketed status marker httpx appends to each URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCategory {
    /// Exactly `[200]`
    Ok200,
    /// `[403]` or `[404]`
    ClientGone,
    /// Any marker opening with `[5`
    ServerError,
    /// Recognized line shape, but a status outside the three buckets
    Other,
}

impl StatusCategory {
    /// Map a marker token like `[200]` to its category.
    pub fn from_marker(marker: &str) -> StatusCategory {
        match marker {
            "[200]" => StatusCategory::Ok200,
            "[403]" | "[404]" => StatusCategory::ClientGone,
            _ if marker.starts_with("[5") => StatusCategory::ServerError,
            _ => StatusCategory::Other,
        }
    }

    /// The result file this category lands in. `Other` maps to none.
    pub fn file_name(&self) -> Option<&'static str> {
        match self {
            StatusCategory::Ok200 => Some(STATUS_OK_FILE),
            StatusCategory::ClientGone => Some(STATUS_CLIENT_GONE_FILE),
            StatusCategory::ServerError => Some(STATUS_SERVER_ERROR_FILE),
            StatusCategory::Other => None,
        }
    }
}

/// Parse one httpx output line of the form `<url> [<code>] ...`.
/// Lines with fewer than two whitespace-separated tokens carry no marker
/// and yield nothing.
pub fn classify_probe_line(line: &str) -> Option<(&str, StatusCategory)> {
    let mut tokens = line.split_whitespace();
    let url = tokens.next()?;
    let marker = tokens.next()?;
    Some((url, StatusCategory::from_marker(marker)))
}

/// Per-bucket counts reported back to the driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProbeSummary {
    pub ok: usize,
    pub client_gone: usize,
    pub server_error: usize,
}

pub struct ProbeStage {
    pub httpx: ToolRunner,
}

impl ProbeStage {
    /// Probe the subdomain set and write the three status-bucket files.
    /// All three files are written even when their bucket is empty.
    pub async fn run(
        &self,
        subdomains: &BTreeSet<String>,
        layout: &OutputLayout,
        logger: &RunLogger,
    ) -> Result<ProbeSummary> {
        logger.info(&format!("Probing {} subdomains with httpx", subdomains.len()));

        let list_file = write_host_list_file(subdomains)?;
        let list_path = list_file.path().to_string_lossy().into_owned();

        let lines = self
            .httpx
            .run(&["-silent", "-status-code", "-no-color", "-l", &list_path])
            .await;

        let mut ok = BTreeSet::new();
        let mut client_gone = BTreeSet::new();
        let mut server_error = BTreeSet::new();

        for line in &lines {
            let Some((url, category)) = classify_probe_line(line) else {
                continue;
            };

            match category {
                StatusCategory::Ok200 => {
                    ok.insert(url.to_string());
                }
                StatusCategory::ClientGone => {
                    client_gone.insert(url.to_string());
                }
                StatusCategory::ServerError => {
                    server_error.insert(url.to_string());
                }
                StatusCategory::Other => {
                    debug!("Unbucketed probe result: {}", line);
                }
            }
        }

        layout.write_sorted_set(STATUS_OK_FILE, &ok)?;
        layout.write_sorted_set(STATUS_CLIENT_GONE_FILE, &client_gone)?;
        layout.write_sorted_set(STATUS_SERVER_ERROR_FILE, &server_error)?;

        let summary = ProbeSummary {
            ok: ok.len(),
            client_gone: client_gone.len(),
            server_error: server_error.len(),
        };

        logger.info(&format!(
            "Probe results: {} ok, {} forbidden-or-missing, {} server errors",
            summary.ok, summary.client_gone, summary.server_error
        ));

        Ok(summary)
    }
}

/// Materialize the subdomain set into a temp file for httpx's `-l` flag.
fn write_host_list_file(subdomains: &BTreeSet<String>) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("Failed to create temp host list")?;
    for host in subdomains {
        writeln!(file, "{}", host).context("Failed to write temp host list")?;
    }
    file.flush().context("Failed to flush temp host list")?;
    Ok(file)
}
