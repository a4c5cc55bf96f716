//! Tests for probe-line and historical-URL classification
//!
//! These tests verify:
//! 1. Status buckets partition probed URLs: every URL lands in at most one
//!    result file, and out-of-scope statuses land in none
//! 2. Wayback URL sets overlap by design: one URL can be a script URL and
//!    a query URL at the same time
//! 3. Endpoint suffix matching is case-sensitive

use scopehound::output::{STATUS_CLIENT_GONE_FILE, STATUS_OK_FILE, STATUS_SERVER_ERROR_FILE};
use scopehound::stages::probe::{classify_probe_line, StatusCategory};
use scopehound::stages::wayback::UrlBuckets;

// ============================================================================
// STATUS BUCKET PARTITION
// ============================================================================

#[test]
fn test_status_buckets_partition_probe_output() {
    let probe_output = [
        "https://a.example.com [200]",
        "https://b.example.com [404]",
        "https://c.example.com [500]",
        "https://d.example.com [301]",
    ];

    let mut destinations = Vec::new();
    for line in probe_output {
        let (url, category) = classify_probe_line(line).expect("well-formed probe line");
        destinations.push((url, category.file_name()));
    }

    assert_eq!(destinations[0], ("https://a.example.com", Some(STATUS_OK_FILE)));
    assert_eq!(destinations[1], ("https://b.example.com", Some(STATUS_CLIENT_GONE_FILE)));
    assert_eq!(destinations[2], ("https://c.example.com", Some(STATUS_SERVER_ERROR_FILE)));
    assert_eq!(
        destinations[3],
        ("https://d.example.com", None),
        "A redirect must not reach any bucket file"
    );
}

#[test]
fn test_each_category_maps_to_exactly_one_file() {
    let bucketed = [
        StatusCategory::Ok200,
        StatusCategory::ClientGone,
        StatusCategory::ServerError,
    ];

    let mut files: Vec<_> = bucketed.iter().filter_map(|c| c.file_name()).collect();
    files.sort();
    files.dedup();
    assert_eq!(files.len(), 3, "The three bucketed categories use three distinct files");
}

#[test]
fn test_malformed_probe_lines_reach_no_bucket() {
    assert!(classify_probe_line("https://bare.example.com").is_none());
    assert!(classify_probe_line("").is_none());

    let (_, category) = classify_probe_line("https://e.example.com oddmarker").unwrap();
    assert_eq!(category.file_name(), None);
}

// ============================================================================
// WAYBACK SET MEMBERSHIP
// ============================================================================

#[test]
fn test_wayback_sets_overlap_for_one_url() {
    let mut buckets = UrlBuckets::default();
    buckets.classify("http://x.example.com/a.js?id=1");

    let url = "http://x.example.com/a.js?id=1";
    assert!(buckets.all_urls.contains(url), "Every URL joins the full set");
    assert!(buckets.script_urls.contains(url), "'.js' substring marks a script URL");
    assert!(buckets.query_urls.contains(url), "'?' marks a query URL");
    assert!(
        !buckets.endpoint_urls.contains(url),
        "No endpoint suffix, so the endpoint set stays out"
    );
}

#[test]
fn test_wayback_fixture_distributes_as_expected() {
    let archived = [
        "http://h.example.com/",
        "http://h.example.com/login.php",
        "http://h.example.com/static/app.js",
        "http://h.example.com/search?q=test",
        "http://h.example.com/report.aspx",
        "http://h.example.com/legacy/form.cgi",
    ];

    let mut buckets = UrlBuckets::default();
    for url in archived {
        buckets.classify(url);
    }

    assert_eq!(buckets.all_urls.len(), 6);
    assert_eq!(buckets.script_urls.len(), 1);
    assert_eq!(buckets.query_urls.len(), 1);

    let endpoints: Vec<_> = buckets.endpoint_urls.iter().cloned().collect();
    assert_eq!(
        endpoints,
        vec![
            "http://h.example.com/legacy/form.cgi",
            "http://h.example.com/login.php",
            "http://h.example.com/report.aspx",
        ],
        "Endpoint set should hold exactly the suffix-matched URLs, sorted"
    );
}

#[test]
fn test_endpoint_matching_is_case_sensitive() {
    let mut buckets = UrlBuckets::default();
    buckets.classify("http://h.example.com/ADMIN.PHP");
    buckets.classify("http://h.example.com/admin.php");

    assert_eq!(buckets.endpoint_urls.len(), 1);
    assert!(buckets.endpoint_urls.contains("http://h.example.com/admin.php"));
}
