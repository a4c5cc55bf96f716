//! Invocation of external recon tools.
//!
//! Every discovery-heavy step (subdomain brute-forcing, HTTP probing,
//! wayback crawling) is delegated to an external binary treated as a black
//! box. This module spawns those binaries with piped stdout, collects their
//! line-oriented output under an optional timeout, and degrades every
//! failure mode - missing binary, spawn error, non-zero exit - to an empty
//! result so the pipeline keeps moving.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

pub struct ToolRunner {
    binary_path: PathBuf,
    timeout: Option<Duration>,
}

impl ToolRunner {
    /// A timeout of 0 seconds means wait for the tool indefinitely.
    pub fn new(binary_path: impl Into<PathBuf>, timeout_secs: u64) -> Self {
        let timeout = if timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(timeout_secs))
        };
        Self {
            binary_path: binary_path.into(),
            timeout,
        }
    }

    pub fn is_available(&self) -> bool {
        self.binary_path.exists() || which::which(&self.binary_path).is_ok()
    }

    /// Tool label for log messages, derived from the binary file name.
    pub fn name(&self) -> String {
        self.binary_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.binary_path.display().to_string())
    }

    /// Run the tool with the given arguments and collect its stdout lines.
    ///
    /// A non-zero exit discards whatever the tool printed, matching the
    /// contract that a failed tool contributes nothing. A timeout kills the
    /// child but keeps the lines read so far.
    pub async fn run(&self, args: &[&str]) -> Vec<String> {
        let name = self.name();

        if !self.is_available() {
            warn!("{} binary not found at {:?}", name, self.binary_path);
            return Vec::new();
        }

        debug!("Running {} {}", name, args.join(" "));

        let mut child = match Command::new(&self.binary_path)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!("Failed to spawn {}: {}", name, e);
                return Vec::new();
            }
        };

        let Some(stdout) = child.stdout.take() else {
            warn!("Failed to capture {} stdout", name);
            let _ = child.kill().await;
            return Vec::new();
        };

        let mut reader = BufReader::new(stdout).lines();
        let mut lines = Vec::new();

        let read_future = async {
            while let Ok(Some(line)) = reader.next_line().await {
                lines.push(line);
            }
        };

        if let Some(limit) = self.timeout {
            if tokio::time::timeout(limit, read_future).await.is_err() {
                warn!(
                    "{} timed out after {:?}, keeping {} lines of partial output",
                    name,
                    limit,
                    lines.len()
                );
                let _ = child.kill().await;
                return lines;
            }
        } else {
            read_future.await;
        }

        // stdout is closed; reap the child and check how it exited
        match child.wait().await {
            Ok(status) if status.success() => {
                debug!("{} produced {} lines", name, lines.len());
                lines
            }
            Ok(status) => {
                warn!("{} exited with {}, discarding its output", name, status);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to wait for {}: {}", name, e);
                Vec::new()
            }
        }
    }
}
