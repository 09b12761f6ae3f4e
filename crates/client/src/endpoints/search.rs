//! Index search endpoint.
//!
//! # What this module handles:
//! - Issuing `POST /{index}/_search` with a [`SearchRequest`] body
//! - Extracting `hits.hits[]._source` documents
//!
//! # What this module does NOT handle:
//! - Fan-out across services or failure isolation (see the engine crate)

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::debug;

use crate::endpoints::{encode_index_pattern, send_request_with_retry};
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{LogRecord, SearchRequest, SearchResponse};

/// Run one search against an index pattern.
#[allow(clippy::too_many_arguments)]
pub async fn search_index(
    client: &Client,
    base_url: &str,
    api_key: Option<&SecretString>,
    index_pattern: &str,
    request: &SearchRequest,
    max_retries: usize,
    timeout: Duration,
    metrics: Option<&MetricsCollector>,
) -> Result<Vec<LogRecord>> {
    debug!(
        index = index_pattern,
        since = %request.since,
        order = %request.order,
        "Searching index"
    );

    let url = format!("{}/{}/_search", base_url, encode_index_pattern(index_pattern));

    let mut builder = client.post(&url).json(&request.body());
    if let Some(key) = api_key {
        builder = builder.header("Authorization", format!("ApiKey {}", key.expose_secret()));
    }

    let response =
        send_request_with_retry(builder, max_retries, index_pattern, timeout, metrics).await?;

    let parsed: SearchResponse = response
        .json()
        .await
        .map_err(|e| ClientError::InvalidResponse(format!("{index_pattern}: {e}")))?;

    let hit_count = parsed.hit_count();
    let records = parsed.into_records();
    if records.len() != hit_count {
        debug!(
            index = index_pattern,
            hits = hit_count,
            records = records.len(),
            "Skipped hits without an object _source"
        );
    }

    Ok(records)
}
