//! Retry helper for HTTP requests with exponential backoff.
//!
//! Requests that fail with HTTP 429 (Too Many Requests) are retried with
//! exponential backoff. Every other outcome is returned immediately.

use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;

/// Maximum number of retry attempts when the caller passes zero.
const DEFAULT_MAX_RETRIES: usize = 3;

/// Sends an HTTP request with automatic retry logic for HTTP 429 responses.
///
/// - Backoff is `2^attempt` seconds (1s, 2s, 4s, ...)
/// - Non-success statuses become [`ClientError::ApiError`], with the
///   backend's `error.type`/`error.reason` extracted when present
/// - Transport failures are classified via [`ClientError::from_transport`]
///
/// # Arguments
///
/// * `builder` - The `reqwest::RequestBuilder` to execute
/// * `max_retries` - Maximum number of retry attempts (defaults to 3 if 0)
/// * `endpoint` - Label used for metrics and logs (the index pattern)
/// * `timeout` - Configured per-call timeout, reported on timeout errors
/// * `metrics` - Optional collector for request metrics
pub async fn send_request_with_retry(
    builder: RequestBuilder,
    max_retries: usize,
    endpoint: &str,
    timeout: Duration,
    metrics: Option<&MetricsCollector>,
) -> Result<Response> {
    let max_retries = if max_retries == 0 {
        DEFAULT_MAX_RETRIES
    } else {
        max_retries
    };

    for attempt in 0..=max_retries {
        let Some(attempt_builder) = builder.try_clone() else {
            debug!("Cannot clone request builder for retry");
            return Err(ClientError::MaxRetriesExceeded(attempt));
        };

        if let Some(m) = metrics {
            m.record_request(endpoint);
            if attempt > 0 {
                m.record_retry(endpoint, attempt);
            }
        }

        let started = Instant::now();
        let outcome = attempt_builder.send().await;

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                let url = e.url().map(|u| u.to_string()).unwrap_or_default();
                let err = ClientError::from_transport(e, &url, timeout);
                if let Some(m) = metrics {
                    m.record_request_duration(endpoint, started.elapsed(), None);
                    m.record_client_error(endpoint, &err);
                }
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        if let Some(m) = metrics {
            m.record_request_duration(endpoint, started.elapsed(), Some(status));
        }

        if ClientError::is_retryable_status(status) {
            if attempt < max_retries {
                let backoff_secs = 2u64.pow(attempt as u32);
                debug!(
                    attempt = attempt + 1,
                    max_retries = max_retries + 1,
                    backoff_secs = backoff_secs,
                    "Rate limited (HTTP 429), retrying with exponential backoff"
                );
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
                continue;
            }
            debug!(
                attempts = attempt + 1,
                "Max retries exhausted for rate-limited request"
            );
            let err = ClientError::MaxRetriesExceeded(max_retries + 1);
            if let Some(m) = metrics {
                m.record_client_error(endpoint, &err);
            }
            return Err(err);
        }

        if response.status().is_success() {
            if attempt > 0 {
                debug!(attempt = attempt + 1, "Request succeeded after retry");
            }
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response body".to_string());
        let err = ClientError::ApiError {
            status,
            url,
            message: error_message_from_body(&body),
        };
        if let Some(m) = metrics {
            m.record_client_error(endpoint, &err);
        }
        return Err(err);
    }

    Err(ClientError::MaxRetriesExceeded(max_retries + 1))
}

/// Pull a readable message out of the backend's error envelope.
///
/// Accepts `{"error": {"type": .., "reason": ..}}`, `{"error": "text"}`,
/// and falls back to the raw body.
fn error_message_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match value.get("error") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(error)) => {
            let kind = error.get("type").and_then(Value::as_str);
            let reason = error.get("reason").and_then(Value::as_str);
            match (kind, reason) {
                (Some(kind), Some(reason)) => format!("{kind}: {reason}"),
                (None, Some(reason)) => reason.to_string(),
                (Some(kind), None) => kind.to_string(),
                (None, None) => body.to_string(),
            }
        }
        _ => body.to_string(),
    }
}
