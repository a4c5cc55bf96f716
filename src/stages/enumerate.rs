//! Stage 1: subdomain enumeration.
//!
//! Merges three sources into one subdomain set: subfinder, the crt.sh
//! certificate-transparency API, and amass in passive mode. The external
//! tools take the target list from a scoped temp file that is removed on
//! every exit path. Each source degrades to an empty contribution when it
//! fails, so a missing binary or an unreachable API never aborts the stage.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

use crate::crtsh::CrtShClient;
use crate::hosts;
use crate::interrupt;
use crate::logger::RunLogger;
use crate::output::{OutputLayout, ALL_SUBDOMAINS_FILE};
use crate::runner::ToolRunner;

pub struct EnumerateStage {
    pub subfinder: ToolRunner,
    pub amass: ToolRunner,
    pub crtsh: CrtShClient,
    /// Run the three sources concurrently instead of one after another.
    /// The final set is identical either way: the union is normalized and
    /// sorted after all sources have reported.
    pub parallel_sources: bool,
}

impl EnumerateStage {
    /// Enumerate subdomains for the target domains and persist the merged
    /// set to `all_subdomains.txt`.
    ///
    /// An interrupted run stops querying but still persists whatever the
    /// completed sources produced.
    pub async fn run(
        &self,
        domains: &[String],
        layout: &OutputLayout,
        logger: &RunLogger,
    ) -> Result<BTreeSet<String>> {
        logger.info(&format!(
            "Enumerating subdomains for {} target domain(s)",
            domains.len()
        ));

        let list_file = write_domain_list_file(domains)?;
        let list_path = list_file.path().to_string_lossy().into_owned();

        let mut raw: Vec<String> = Vec::new();

        if self.parallel_sources {
            let (subfinder_out, crtsh_out, amass_out) = tokio::join!(
                self.run_subfinder(&list_path),
                self.sweep_crtsh(domains, logger),
                self.run_amass(&list_path),
            );
            logger.info(&format!("subfinder contributed {} entries", subfinder_out.len()));
            logger.info(&format!("crt.sh contributed {} entries", crtsh_out.len()));
            logger.info(&format!("amass contributed {} entries", amass_out.len()));
            raw.extend(subfinder_out);
            raw.extend(crtsh_out);
            raw.extend(amass_out);
        } else {
            let subfinder_out = self.run_subfinder(&list_path).await;
            logger.info(&format!("subfinder contributed {} entries", subfinder_out.len()));
            raw.extend(subfinder_out);

            if !interrupt::is_interrupted() {
                let crtsh_out = self.sweep_crtsh(domains, logger).await;
                logger.info(&format!("crt.sh contributed {} entries", crtsh_out.len()));
                raw.extend(crtsh_out);
            }

            if !interrupt::is_interrupted() {
                let amass_out = self.run_amass(&list_path).await;
                logger.info(&format!("amass contributed {} entries", amass_out.len()));
                raw.extend(amass_out);
            }
        }

        let subdomains = hosts::normalize_subdomains(raw);
        layout.write_sorted_set(ALL_SUBDOMAINS_FILE, &subdomains)?;

        logger.info(&format!(
            "Found {} unique subdomains, saved to {}",
            subdomains.len(),
            layout.path(ALL_SUBDOMAINS_FILE).display()
        ));

        Ok(subdomains)
    }

    async fn run_subfinder(&self, list_path: &str) -> Vec<String> {
        self.subfinder.run(&["-silent", "-dL", list_path]).await
    }

    async fn run_amass(&self, list_path: &str) -> Vec<String> {
        self.amass
            .run(&["enum", "-passive", "-dL", list_path, "-silent"])
            .await
    }

    /// One crt.sh query per target domain. The client's rate limiter spaces
    /// the requests; a failed query skips that domain and the sweep
    /// continues.
    async fn sweep_crtsh(&self, domains: &[String], logger: &RunLogger) -> Vec<String> {
        let mut names = Vec::new();

        for domain in domains {
            if interrupt::is_interrupted() {
                logger.warn("Enumeration interrupted, skipping remaining crt.sh queries");
                break;
            }

            logger.debug(&format!("Querying crt.sh for {}", domain));
            names.extend(self.crtsh.subdomains_for(domain).await);
        }

        names
    }
}

/// Materialize the target domains into a temp file for tools that take
/// their input as `-dL <file>`. The returned guard deletes the file when
/// dropped.
fn write_domain_list_file(domains: &[String]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("Failed to create temp domain list")?;
    for domain in domains {
        writeln!(file, "{}", domain).context("Failed to write temp domain list")?;
    }
    file.flush().context("Failed to flush temp domain list")?;
    Ok(file)
}
