//! Metrics collection for search backend calls.
//!
//! This module provides metrics collection for search requests, including:
//! - Request latency histograms
//! - Request counters (total, retries, errors)
//! - Error categorization
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (see `metrics_exporter`)
//!
//! # Invariants
//! - All metrics use consistent label names: `index`, `status`, `error_category`
//! - Metric recording is infallible
//! - Zero-cost when no metrics recorder is installed

use crate::error::ClientError;
use std::time::Duration;

/// Metric name for request duration histogram.
pub const METRIC_REQUEST_DURATION: &str = "logviewer_search_request_duration_seconds";

/// Metric name for total request counter.
pub const METRIC_REQUESTS_TOTAL: &str = "logviewer_search_requests_total";

/// Metric name for retry counter.
pub const METRIC_RETRIES_TOTAL: &str = "logviewer_search_retries_total";

/// Metric name for error counter.
pub const METRIC_ERRORS_TOTAL: &str = "logviewer_search_errors_total";

/// Error categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport-level errors (connection refused, DNS, etc.)
    Transport,
    /// HTTP 4xx client errors (missing index, bad credentials)
    Http4xx,
    /// HTTP 5xx server errors
    Http5xx,
    /// Request timeout
    Timeout,
    /// Response could not be decoded
    Decode,
    /// Rate limited past the retry budget
    RateLimited,
    /// Unknown/unclassified errors
    Unknown,
}

impl ErrorCategory {
    /// Returns the string label for this error category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Http4xx => "http_4xx",
            ErrorCategory::Http5xx => "http_5xx",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Decode => "decode",
            ErrorCategory::RateLimited => "rate_limited",
            ErrorCategory::Unknown => "unknown",
        }
    }
}

impl From<&ClientError> for ErrorCategory {
    fn from(error: &ClientError) -> Self {
        match error {
            ClientError::Timeout(_) => ErrorCategory::Timeout,
            ClientError::ConnectionRefused(_) => ErrorCategory::Transport,
            ClientError::InvalidResponse(_) => ErrorCategory::Decode,
            ClientError::MaxRetriesExceeded(_) => ErrorCategory::RateLimited,
            ClientError::ApiError { status, .. } => {
                if (400..500).contains(status) {
                    ErrorCategory::Http4xx
                } else if (500..600).contains(status) {
                    ErrorCategory::Http5xx
                } else {
                    ErrorCategory::Unknown
                }
            }
            ClientError::HttpError(e) => {
                if e.is_timeout() {
                    ErrorCategory::Timeout
                } else if e.is_connect() || e.is_request() {
                    ErrorCategory::Transport
                } else if e.is_decode() {
                    ErrorCategory::Decode
                } else {
                    ErrorCategory::Unknown
                }
            }
            ClientError::InvalidUrl(_) => ErrorCategory::Unknown,
        }
    }
}

/// Metrics collector for search backend calls.
///
/// A thin wrapper around the `metrics` crate macros with consistent labels.
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    enabled: bool,
}

impl MetricsCollector {
    /// Create an enabled metrics collector.
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Create a collector that records nothing.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Check if metrics collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record the duration of one request attempt.
    ///
    /// `status` is `None` when the request failed before a response arrived.
    pub fn record_request_duration(&self, index: &str, duration: Duration, status: Option<u16>) {
        if !self.enabled {
            return;
        }

        let status_label = status.map_or("error".to_string(), |s| s.to_string());

        metrics::histogram!(METRIC_REQUEST_DURATION,
            "index" => index.to_string(),
            "status" => status_label,
        )
        .record(duration.as_secs_f64());
    }

    /// Record a request attempt, including retries.
    pub fn record_request(&self, index: &str) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_REQUESTS_TOTAL, "index" => index.to_string()).increment(1);
    }

    /// Record a retry attempt (1-based).
    pub fn record_retry(&self, index: &str, attempt: usize) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_RETRIES_TOTAL,
            "index" => index.to_string(),
            "attempt" => attempt.to_string(),
        )
        .increment(1);
    }

    /// Record an error in the given category.
    pub fn record_error(&self, index: &str, category: ErrorCategory) {
        if !self.enabled {
            return;
        }

        metrics::counter!(METRIC_ERRORS_TOTAL,
            "index" => index.to_string(),
            "error_category" => category.as_str(),
        )
        .increment(1);
    }

    /// Record an error, categorizing it automatically.
    pub fn record_client_error(&self, index: &str, error: &ClientError) {
        self.record_error(index, ErrorCategory::from(error));
    }
}
