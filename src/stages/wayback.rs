//! Stage 3: historical-URL harvesting.
//!
//! Runs waybackurls for each enumerated host, in file order, and sorts
//! every archived URL into four overlapping sets. All four result files
//! are rewritten after each host, so an interrupt costs at most the host
//! in flight; everything flushed before it stays on disk.

use anyhow::Result;
use std::collections::BTreeSet;

use crate::interrupt;
use crate::logger::RunLogger;
use crate::output::{
    OutputLayout, WAYBACK_ALL_FILE, WAYBACK_ENDPOINTS_FILE, WAYBACK_JS_FILE, WAYBACK_PARAMS_FILE,
};
use crate::runner::ToolRunner;

/// Suffixes that mark a URL as a server-page endpoint. Matching is
/// case-sensitive: `.PHP` does not count.
const ENDPOINT_SUFFIXES: [&str; 4] = [".php", ".aspx", ".jsp", ".cgi"];

/// The four overlapping URL sets the harvest accumulates.
///
/// Membership tests are independent, so one URL can land in several sets;
/// `/api/v1.js?cb=1` belongs to the script set and the query set at once.
#[derive(Debug, Default)]
pub struct UrlBuckets {
    pub all_urls: BTreeSet<String>,
    pub script_urls: BTreeSet<String>,
    pub query_urls: BTreeSet<String>,
    pub endpoint_urls: BTreeSet<String>,
}

impl UrlBuckets {
    /// Route one archived URL into every set whose predicate matches.
    pub fn classify(&mut self, url: &str) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }

        self.all_urls.insert(url.to_string());

        if url.contains(".js") {
            self.script_urls.insert(url.to_string());
        }
        if url.contains('?') {
            self.query_urls.insert(url.to_string());
        }
        if ENDPOINT_SUFFIXES.iter().any(|suffix| url.ends_with(suffix)) {
            self.endpoint_urls.insert(url.to_string());
        }
    }

    /// Rewrite all four result files from the current sets.
    pub fn flush(&self, layout: &OutputLayout) -> Result<()> {
        layout.write_sorted_set(WAYBACK_ALL_FILE, &self.all_urls)?;
        layout.write_sorted_set(WAYBACK_JS_FILE, &self.script_urls)?;
        layout.write_sorted_set(WAYBACK_PARAMS_FILE, &self.query_urls)?;
        layout.write_sorted_set(WAYBACK_ENDPOINTS_FILE, &self.endpoint_urls)?;
        Ok(())
    }
}

/// Harvest coverage reported back to the driver.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaybackSummary {
    pub hosts_covered: usize,
    pub hosts_total: usize,
    pub url_count: usize,
    pub interrupted: bool,
}

pub struct WaybackStage {
    pub waybackurls: ToolRunner,
}

impl WaybackStage {
    /// Harvest archived URLs for each host and keep the four result files
    /// current after every host. Hosts are visited in the order given.
    pub async fn run(
        &self,
        hosts: &[String],
        layout: &OutputLayout,
        logger: &RunLogger,
    ) -> Result<WaybackSummary> {
        logger.info(&format!(
            "Harvesting historical URLs for {} hosts",
            hosts.len()
        ));

        let mut buckets = UrlBuckets::default();
        let mut covered = 0;

        logger.start_progress(hosts.len() as u64).await;

        for host in hosts {
            if interrupt::is_interrupted() {
                logger.warn("Harvest interrupted, stopping before the next host");
                break;
            }

            logger.update_progress(&format!("waybackurls {}", host)).await;

            let lines = self.waybackurls.run(&[host]).await;
            for url in &lines {
                buckets.classify(url);
            }
            covered += 1;

            // Keep the files current at host granularity
            buckets.flush(layout)?;

            logger.debug(&format!("{}: {} archived URLs", host, lines.len()));
            logger.advance_progress(1).await;
        }

        let summary = WaybackSummary {
            hosts_covered: covered,
            hosts_total: hosts.len(),
            url_count: buckets.all_urls.len(),
            interrupted: interrupt::is_interrupted(),
        };

        logger
            .finish_progress(&format!(
                "Harvested {} URLs across {}/{} hosts",
                summary.url_count, summary.hosts_covered, summary.hosts_total
            ))
            .await;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_lands_in_every_matching_set() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://x.example.com/a.js?id=1");

        assert!(buckets.all_urls.contains("http://x.example.com/a.js?id=1"));
        assert!(buckets.script_urls.contains("http://x.example.com/a.js?id=1"));
        assert!(buckets.query_urls.contains("http://x.example.com/a.js?id=1"));
        assert!(buckets.endpoint_urls.is_empty(), "A .js URL is not an endpoint");
    }

    #[test]
    fn test_endpoint_suffixes() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://h.example.com/login.php");
        buckets.classify("http://h.example.com/report.aspx");
        buckets.classify("http://h.example.com/form.cgi");

        assert_eq!(buckets.endpoint_urls.len(), 3);
    }

    #[test]
    fn test_endpoint_suffix_is_case_sensitive() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://h.example.com/LOGIN.PHP");

        assert!(buckets.endpoint_urls.is_empty());
        assert!(buckets.all_urls.contains("http://h.example.com/LOGIN.PHP"));
    }

    #[test]
    fn test_jsp_url_is_both_script_and_endpoint() {
        // ".jsp" contains the ".js" substring, so a .jsp page lands in the
        // script set as well as the endpoint set
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://h.example.com/admin.jsp");

        assert!(buckets.script_urls.contains("http://h.example.com/admin.jsp"));
        assert!(buckets.endpoint_urls.contains("http://h.example.com/admin.jsp"));
    }

    #[test]
    fn test_json_counts_as_script_match() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://h.example.com/data.json");

        assert!(buckets.script_urls.contains("http://h.example.com/data.json"));
        assert!(buckets.endpoint_urls.is_empty());
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("   ");
        buckets.classify("");

        assert!(buckets.all_urls.is_empty());
    }

    #[test]
    fn test_duplicate_urls_collapse() {
        let mut buckets = UrlBuckets::default();
        buckets.classify("http://h.example.com/index.php");
        buckets.classify("http://h.example.com/index.php");

        assert_eq!(buckets.all_urls.len(), 1);
        assert_eq!(buckets.endpoint_urls.len(), 1);
    }
}
