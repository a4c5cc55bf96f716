//! Result-file layout and atomic persistence.
//!
//! All results land in one flat directory under fixed names. Files are
//! rewritten wholesale on every flush through a temp-file-then-rename
//! sequence, so an interrupt mid-write can never leave a torn file: readers
//! see either the previous complete version or the new one.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ALL_SUBDOMAINS_FILE: &str = "all_subdomains.txt";
pub const STATUS_OK_FILE: &str = "200.txt";
pub const STATUS_CLIENT_GONE_FILE: &str = "403_404.txt";
pub const STATUS_SERVER_ERROR_FILE: &str = "5xx.txt";
pub const WAYBACK_ALL_FILE: &str = "wayback_data.txt";
pub const WAYBACK_JS_FILE: &str = "js_files.txt";
pub const WAYBACK_PARAMS_FILE: &str = "params.txt";
pub const WAYBACK_ENDPOINTS_FILE: &str = "endpoints.txt";

/// Handle on the directory every result file is written into.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
}

impl OutputLayout {
    /// Bind to an output directory, creating it if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Persist a line set under the given result-file name. An empty set
    /// still produces the (empty) file.
    pub fn write_sorted_set(&self, file_name: &str, lines: &BTreeSet<String>) -> Result<()> {
        let path = self.path(file_name);
        write_lines_atomic(&path, lines.iter().map(|s| s.as_str()))?;
        debug!("Wrote {} lines to {}", lines.len(), path.display());
        Ok(())
    }
}

/// Write lines to a file atomically: write a sibling temp file, fsync it,
/// then rename over the target.
pub fn write_lines_atomic<'a, I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let temp_path = path.with_extension("tmp");

    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }

    {
        let mut file = std::fs::File::create(&temp_path)
            .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
        // Flush to disk before the rename makes the write visible
        file.sync_all()
            .with_context(|| format!("Failed to sync temp file: {}", temp_path.display()))?;
    }

    std::fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;

    Ok(())
}
