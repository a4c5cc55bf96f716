//! Tests for the crt.sh certificate-transparency client
//!
//! These tests verify:
//! 1. SAN names are extracted from JSON records, split on newlines
//! 2. Non-200 responses, malformed JSON, and empty bodies contribute nothing
//! 3. A failed query degrades to an empty result instead of an error that
//!    would abort a multi-domain sweep

mod common;

use common::wiremock_helpers::{
    crtsh_record, mock_crtsh_error_server, mock_crtsh_raw_server, mock_crtsh_server,
};
use scopehound::config::HttpConfig;
use scopehound::crtsh::CrtShClient;
use scopehound::rate_limit::SharedRateLimiter;

fn test_http_config() -> HttpConfig {
    HttpConfig {
        request_timeout_secs: 5,
        user_agent: "scopehound-tests/0.1".to_string(),
    }
}

fn client_for(server_uri: &str) -> CrtShClient {
    // Throttling off: these tests exercise parsing, not pacing
    CrtShClient::with_base_url(server_uri, &test_http_config(), SharedRateLimiter::new(0))
}

// ============================================================================
// SUCCESSFUL RESPONSES
// ============================================================================

#[tokio::test]
async fn test_san_names_extracted_and_split_on_newlines() {
    let server = mock_crtsh_server(
        "example.com",
        vec![
            crtsh_record("www.example.com\napi.example.com"),
            crtsh_record("mail.example.com"),
        ],
    )
    .await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert_eq!(names.len(), 3, "Every SAN line should become one name: {:?}", names);
    assert!(names.contains(&"www.example.com".to_string()));
    assert!(names.contains(&"api.example.com".to_string()));
    assert!(names.contains(&"mail.example.com".to_string()));
}

#[tokio::test]
async fn test_names_are_trimmed_but_not_otherwise_normalized() {
    let server = mock_crtsh_server(
        "example.com",
        vec![crtsh_record("  Spaced.Example.COM  \n*.example.com")],
    )
    .await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    // Lowercasing and wildcard filtering happen when sources are merged,
    // not in the client
    assert_eq!(names, vec!["Spaced.Example.COM", "*.example.com"]);
}

#[tokio::test]
async fn test_records_without_name_value_are_skipped() {
    let server = mock_crtsh_server(
        "example.com",
        vec![
            serde_json::json!({ "id": 12345 }),
            crtsh_record("real.example.com"),
        ],
    )
    .await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert_eq!(names, vec!["real.example.com"]);
}

// ============================================================================
// DEGRADED RESPONSES
// ============================================================================

#[tokio::test]
async fn test_non_200_response_contributes_nothing() {
    let server = mock_crtsh_error_server(503).await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert!(names.is_empty(), "A 503 should yield an empty contribution, got {:?}", names);
}

#[tokio::test]
async fn test_malformed_json_contributes_nothing() {
    let server = mock_crtsh_raw_server("<html>definitely not json</html>").await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert!(names.is_empty());
}

#[tokio::test]
async fn test_empty_array_body_contributes_nothing() {
    let server = mock_crtsh_raw_server("[]").await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert!(names.is_empty());
}

#[tokio::test]
async fn test_empty_body_contributes_nothing() {
    let server = mock_crtsh_raw_server("").await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("example.com").await;

    assert!(names.is_empty());
}

#[tokio::test]
async fn test_query_for_unknown_domain_gets_default_404() {
    // The mock only matches q=%.example.com; a query for another domain
    // falls through to wiremock's 404 and must degrade the same way
    let server = mock_crtsh_server("example.com", vec![crtsh_record("a.example.com")]).await;

    let client = client_for(&server.uri());
    let names = client.subdomains_for("other.org").await;

    assert!(names.is_empty());
}
