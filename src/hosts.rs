//! Target-list parsing and subdomain normalization.
//!
//! Every enumeration source feeds raw lines through `normalize_subdomains`,
//! so trimming, lowercasing, wildcard filtering, and deduplication happen
//! in exactly one place.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Read target domains from a file, one per line.
pub fn read_domain_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    Ok(parse_domain_list(&content))
}

/// Parse a newline-delimited domain list, skipping blank lines, `#`
/// comments, and entries that are not plausible domain names.
pub fn parse_domain_list(content: &str) -> Vec<String> {
    let mut domains = Vec::new();

    for line in content.lines() {
        let entry = line.trim();
        if entry.is_empty() || entry.starts_with('#') {
            continue;
        }

        let entry = entry.to_lowercase();
        if is_valid_domain(&entry) {
            domains.push(entry);
        } else {
            warn!("Skipping invalid domain entry: {}", entry);
        }
    }

    domains
}

/// Basic shape check for a domain name: dotted, no scheme or path, no
/// stray leading/trailing separators, hostname characters only.
pub fn is_valid_domain(domain: &str) -> bool {
    if !domain.contains('.') || domain.contains("..") {
        return false;
    }

    if domain.contains("://") || domain.contains('/') {
        return false;
    }

    if domain.starts_with('.') || domain.ends_with('.')
        || domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }

    domain.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// Collapse raw enumeration output into the canonical subdomain set:
/// trimmed, lowercased, blanks and wildcard entries dropped. The BTreeSet
/// provides deduplication and lexicographic order in one step.
pub fn normalize_subdomains<I, S>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty() && !s.contains('*'))
        .collect()
}
