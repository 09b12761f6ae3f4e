//! Search backend connection settings.

use secrecy::SecretString;
use std::fmt;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_SEARCH_URL, DEFAULT_TIMEOUT_SECS};

/// Connection configuration for the search backend.
#[derive(Clone)]
pub struct SearchConfig {
    /// Base URL of the search backend (no trailing slash).
    pub base_url: String,
    /// Optional API key sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<SecretString>,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Retries on HTTP 429.
    pub max_retries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = SearchConfig {
            api_key: Some(SecretString::new("super-secret-key".to_string().into())),
            ..Default::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.base_url, "http://localhost:9200");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.api_key.is_none());
    }
}
