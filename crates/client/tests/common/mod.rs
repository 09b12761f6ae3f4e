//! Common test utilities for integration tests.
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

#[allow(unused_imports)]
pub use logviewer_client::{ClientError, LogRecord, SearchClient, SearchRequest, SortOrder};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

/// Build a client pointed at the mock server.
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> SearchClient {
    SearchClient::builder()
        .base_url(server.uri())
        .max_retries(2)
        .build()
        .expect("client should build")
}

/// Wrap documents in a search response envelope.
#[allow(dead_code)]
pub fn hits(sources: Vec<serde_json::Value>) -> serde_json::Value {
    let hits: Vec<serde_json::Value> = sources
        .into_iter()
        .map(|source| serde_json::json!({ "_index": "test", "_source": source }))
        .collect();
    serde_json::json!({
        "took": 1,
        "timed_out": false,
        "hits": { "total": { "value": hits.len() }, "hits": hits }
    })
}
