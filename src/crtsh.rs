//! Certificate Transparency lookups via crt.sh.
//!
//! Queries the crt.sh JSON endpoint for certificates issued under a domain
//! and extracts subdomains from the certificate Subject Alternative Names.
//! Every failure mode (non-200 status, timeout, malformed JSON) degrades to
//! an empty contribution for that domain so the sweep keeps going.

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::rate_limit::SharedRateLimiter;

const CRTSH_BASE_URL: &str = "https://crt.sh";

/// One certificate record from the crt.sh API. Only the SAN list matters
/// here; the remaining response fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CrtShEntry {
    /// Subject Alternative Names (newline separated)
    pub name_value: Option<String>,
}

pub struct CrtShClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    limiter: SharedRateLimiter,
}

impl CrtShClient {
    pub fn new(http: &HttpConfig, limiter: SharedRateLimiter) -> Self {
        Self::with_base_url(CRTSH_BASE_URL, http, limiter)
    }

    /// Point the client at a different endpoint. Used by tests to swap in a
    /// mock server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        http: &HttpConfig,
        limiter: SharedRateLimiter,
    ) -> Self {
        let timeout = Duration::from_secs(http.request_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(http.user_agent.clone())
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into(),
            timeout,
            limiter,
        }
    }

    /// Fetch every SAN name crt.sh knows under the given domain.
    ///
    /// Failures are logged and yield an empty list; a sweep over many
    /// domains never aborts because one of them errored.
    pub async fn subdomains_for(&self, domain: &str) -> Vec<String> {
        self.limiter.acquire().await;

        match self.query(domain).await {
            Ok(entries) => {
                let names = extract_names(&entries);
                debug!("crt.sh returned {} names for {}", names.len(), domain);
                names
            }
            Err(e) => {
                warn!("crt.sh query failed for {}: {}", domain, e);
                Vec::new()
            }
        }
    }

    /// Query crt.sh for certificates issued under a domain
    async fn query(&self, domain: &str) -> Result<Vec<CrtShEntry>> {
        // Wildcard query (%.domain.com) to match every subdomain
        let url = format!(
            "{}/?q=%25.{}&output=json",
            self.base_url,
            urlencoding::encode(domain)
        );

        debug!("Querying crt.sh: {}", url);

        let response = self.client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("crt.sh returned status {} for {}", response.status(), domain);
            return Ok(Vec::new());
        }

        let text = response.text().await?;

        // crt.sh returns an empty result as "[]" or sometimes an empty body
        if text.is_empty() || text == "[]" {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Vec<CrtShEntry>>(&text) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!("Failed to parse crt.sh response for {}: {}", domain, e);
                Ok(Vec::new())
            }
        }
    }
}

/// Flatten crt.sh entries into individual SAN names (used internally and
/// for testing). Names come back as found; normalization happens when the
/// sources are merged.
pub fn extract_names(entries: &[CrtShEntry]) -> Vec<String> {
    entries
        .iter()
        .filter_map(|entry| entry.name_value.as_deref())
        .flat_map(|name_value| name_value.lines())
        .map(|san| san.trim().to_string())
        .filter(|san| !san.is_empty())
        .collect()
}
