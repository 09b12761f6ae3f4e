//! Error types for the search client.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the search backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success response from the backend.
    #[error("API error ({status}) at {url}: {message}")]
    ApiError {
        status: u16,
        url: String,
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    /// Request timed out.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused.
    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    /// Maximum retries exceeded.
    #[error("Maximum retries exceeded ({0} attempts)")]
    MaxRetriesExceeded(usize),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::HttpError(_) | Self::Timeout(_) | Self::MaxRetriesExceeded(_)
        )
    }

    /// Check if an HTTP status code is retryable.
    ///
    /// Only 429 (Too Many Requests) is retried; every other status is
    /// surfaced to the caller immediately.
    pub fn is_retryable_status(status: u16) -> bool {
        status == 429
    }

    /// Classify a transport error, mapping timeouts and refused connections
    /// onto their dedicated variants.
    pub fn from_transport(err: reqwest::Error, url: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::ConnectionRefused(url.to_string())
        } else {
            Self::HttpError(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        let err = ClientError::Timeout(Duration::from_secs(1));
        assert!(err.is_retryable());

        let err = ClientError::InvalidResponse("test".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_retryable_status() {
        assert!(ClientError::is_retryable_status(429));

        assert!(!ClientError::is_retryable_status(400));
        assert!(!ClientError::is_retryable_status(404));
        assert!(!ClientError::is_retryable_status(500));
        assert!(!ClientError::is_retryable_status(503));
        assert!(!ClientError::is_retryable_status(200));
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::ApiError {
            status: 404,
            url: "http://localhost:9200/app-ums-2*/_search".to_string(),
            message: "index_not_found_exception: no such index [app-ums-2*]".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error (404) at http://localhost:9200/app-ums-2*/_search: index_not_found_exception: no such index [app-ums-2*]"
        );
    }
}
