use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a mock crt.sh server that answers the wildcard certificate query
/// for a domain with the given JSON records.
///
/// The server matches GET requests at `/` with `q=%.{domain}` and
/// `output=json`, mirroring the real crt.sh query shape.
pub async fn mock_crtsh_server(domain: &str, records: Vec<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", format!("%.{}", domain)))
        .and(query_param("output", "json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::Value::Array(records))
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock crt.sh server that answers every request with the given
/// HTTP status code and no body.
pub async fn mock_crtsh_error_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(&server)
        .await;

    server
}

/// Creates a mock crt.sh server that answers every request with a literal
/// body. Useful for the empty-array and malformed-JSON cases.
pub async fn mock_crtsh_raw_server(body: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    server
}

/// Shorthand for one crt.sh certificate record with the given SAN block.
pub fn crtsh_record(name_value: &str) -> serde_json::Value {
    serde_json::json!({ "name_value": name_value })
}
