//! Search backend client.
//!
//! This module provides [`SearchClient`], the HTTP implementation of
//! [`crate::SearchBackend`].
//!
//! # Submodules
//! - [`builder`]: Client construction and configuration
//!
//! # What this module does NOT handle:
//! - Direct HTTP request implementation (delegated to [`crate::endpoints`])
//! - Which services exist or how their failures are treated (engine crate)

pub mod builder;

use secrecy::SecretString;
use std::time::Duration;

use crate::endpoints;
use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::models::{LogRecord, SearchRequest};

/// Search backend client.
///
/// # Creating a Client
///
/// ```rust,ignore
/// use logviewer_client::SearchClient;
///
/// let client = SearchClient::builder()
///     .base_url("http://localhost:9200".to_string())
///     .build()?;
/// ```
#[derive(Debug)]
pub struct SearchClient {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<SecretString>,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: usize,
    pub(crate) metrics: Option<MetricsCollector>,
}

impl SearchClient {
    /// Create a new client builder.
    pub fn builder() -> builder::SearchClientBuilder {
        builder::SearchClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests carry an API key.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search one index pattern.
    pub async fn search_index(
        &self,
        index_pattern: &str,
        request: &SearchRequest,
    ) -> Result<Vec<LogRecord>> {
        endpoints::search_index(
            &self.http,
            &self.base_url,
            self.api_key.as_ref(),
            index_pattern,
            request,
            self.max_retries,
            self.timeout,
            self.metrics.as_ref(),
        )
        .await
    }
}
