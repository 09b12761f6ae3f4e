//! Client builder for constructing [`SearchClient`] instances.
//!
//! This module is responsible for:
//! - Providing a fluent builder API for client configuration
//! - Validating the required base URL
//! - Normalizing the base URL (removing trailing slashes)
//! - Configuring the underlying HTTP client timeout
//!
//! # Invariants
//! - `base_url` is required and must be provided before calling `build()`
//! - The base URL is always normalized to have no trailing slashes

use secrecy::SecretString;
use std::time::Duration;

use crate::client::SearchClient;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsCollector;
use logviewer_config::SearchConfig;
use logviewer_config::constants::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};

/// Builder for creating a new [`SearchClient`].
pub struct SearchClientBuilder {
    base_url: Option<String>,
    api_key: Option<SecretString>,
    timeout: Duration,
    max_retries: usize,
    metrics: Option<MetricsCollector>,
}

impl Default for SearchClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            metrics: None,
        }
    }
}

impl SearchClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the search backend, e.g. `http://localhost:9200`.
    ///
    /// Trailing slashes are removed.
    pub fn base_url(mut self, url: String) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Set the API key sent with every request.
    pub fn api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Set the per-call timeout. Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for rate-limited requests.
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the metrics collector.
    pub fn metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Create a client builder from configuration.
    pub fn from_config(mut self, config: &SearchConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.api_key = config.api_key.clone();
        self.timeout = config.timeout;
        self.max_retries = config.max_retries;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when no base URL was provided, or
    /// [`ClientError::HttpError`] when the HTTP client cannot be constructed.
    pub fn build(self) -> Result<SearchClient> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::InvalidUrl("base_url is required".to_string()))?;

        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        Ok(SearchClient {
            http,
            base_url,
            api_key: self.api_key,
            timeout: self.timeout,
            max_retries: self.max_retries,
            metrics: self.metrics,
        })
    }
}
