//! Configuration loader builder implementation.
//!
//! Responsibilities:
//! - Provide a builder-pattern `ConfigLoader` for layered configuration merging.
//! - Support loading from environment variables and direct builder methods.
//! - Validate and build the final `Config`.
//!
//! Does NOT handle:
//! - Direct environment variable parsing logic (delegated to env.rs).
//!
//! Invariants / Assumptions:
//! - Builder methods called after `from_env()` override environment values.
//! - `load_dotenv()` must be called explicitly to enable `.env` file loading.
//! - The `DOTENV_DISABLED` variable is checked before `dotenvy::dotenv()` is called.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::env::apply_env;
use super::error::ConfigError;
use crate::constants::{
    DEFAULT_BIND_HOST, DEFAULT_CORS_ORIGINS, DEFAULT_LEDGER_PATH, DEFAULT_MAX_RETRIES,
    DEFAULT_PORT, DEFAULT_SEARCH_URL, DEFAULT_TIMEOUT_SECS, MAX_MAX_RETRIES, MAX_TIMEOUT_SECS,
};
use crate::types::{Config, SearchConfig, ServerConfig};

/// Configuration loader that builds config from environment variables and overrides.
#[derive(Default)]
pub struct ConfigLoader {
    search_url: Option<String>,
    api_key: Option<SecretString>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    ledger_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var("DOTENV_DISABLED").ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    /// Load environment variables from .env file if present.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the .env file is not loaded.
    /// Missing `.env` files are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvParse` or `ConfigError::DotenvIo` when the
    /// file exists but cannot be used.
    pub fn load_dotenv(self) -> Result<Self, ConfigError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }

        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(ConfigError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(ConfigError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(ConfigError::DotenvUnknown),
        }
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Read configuration from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        apply_env(&mut self)?;
        Ok(self)
    }

    /// Set the search backend URL.
    pub fn with_search_url(mut self, url: String) -> Self {
        self.search_url = Some(url);
        self
    }

    /// Set the search backend API key.
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    /// Set the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the listen host.
    pub fn with_host(mut self, host: String) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the allowed cross-origin callers.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Set the error ledger path.
    pub fn with_ledger_path(mut self, path: PathBuf) -> Self {
        self.ledger_path = Some(path);
        self
    }

    pub(crate) fn set_search_url(&mut self, url: Option<String>) {
        self.search_url = url;
    }

    pub(crate) fn set_api_key(&mut self, key: Option<SecretString>) {
        self.api_key = key;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    pub(crate) fn set_max_retries(&mut self, retries: Option<usize>) {
        self.max_retries = retries;
    }

    pub(crate) fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    pub(crate) fn set_port(&mut self, port: Option<u16>) {
        self.port = port;
    }

    pub(crate) fn set_cors_origins(&mut self, origins: Option<Vec<String>>) {
        self.cors_origins = origins;
    }

    pub(crate) fn set_ledger_path(&mut self, path: Option<PathBuf>) {
        self.ledger_path = path;
    }

    /// Build the final configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = validate_and_normalize_search_url(
            self.search_url.as_deref().unwrap_or(DEFAULT_SEARCH_URL),
        )?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        validate_timeout(timeout)?;

        let max_retries = self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries > MAX_MAX_RETRIES {
            return Err(ConfigError::InvalidMaxRetries {
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_MAX_RETRIES, max_retries
                ),
            });
        }

        let search = SearchConfig {
            base_url,
            api_key: self.api_key,
            timeout,
            max_retries,
        };

        let server = ServerConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            cors_origins: self.cors_origins.unwrap_or_else(|| {
                DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect()
            }),
        };

        Ok(Config {
            search,
            server,
            ledger_path: self
                .ledger_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH)),
        })
    }
}

fn validate_timeout(timeout: Duration) -> Result<(), ConfigError> {
    let secs = timeout.as_secs();
    if secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            message: "timeout must be greater than 0 seconds".to_string(),
        });
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::InvalidTimeout {
            message: format!(
                "timeout exceeds maximum allowed value of {} seconds",
                MAX_TIMEOUT_SECS
            ),
        });
    }
    Ok(())
}

fn validate_and_normalize_search_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(ConfigError::MissingSearchUrl);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
        var: "search_url".into(),
        message: format!(
            "must be an absolute http(s) URL with a host (e.g. http://localhost:9200): {e}"
        ),
    })?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ConfigError::InvalidValue {
            var: "search_url".into(),
            message: format!("scheme must be http or https, got: {scheme}"),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::InvalidValue {
            var: "search_url".into(),
            message: "host is required (e.g. http://localhost:9200)".into(),
        });
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_build_defaults() {
        let config = ConfigLoader::new().build().unwrap();
        assert_eq!(config.search.base_url, "http://localhost:9200");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ledger_path, PathBuf::from("error-log.json"));
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
    }

    #[test]
    fn test_search_url_is_normalized() {
        let config = ConfigLoader::new()
            .with_search_url("  http://logging-es.internal:9200/  ".to_string())
            .build()
            .unwrap();
        assert_eq!(config.search.base_url, "http://logging-es.internal:9200");
    }

    #[test]
    fn test_blank_search_url_is_rejected() {
        let err = ConfigLoader::new()
            .with_search_url("   ".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSearchUrl));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = ConfigLoader::new()
            .with_search_url("ftp://example.com".to_string())
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = ConfigLoader::new()
            .with_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { .. }));
    }

    #[test]
    fn test_excessive_retries_are_rejected() {
        let err = ConfigLoader::new()
            .with_max_retries(MAX_MAX_RETRIES + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxRetries { .. }));
    }

    #[test]
    fn test_api_key_is_carried() {
        let config = ConfigLoader::new()
            .with_api_key("abc123".to_string())
            .build()
            .unwrap();
        assert_eq!(
            config.search.api_key.as_ref().map(|k| k.expose_secret().to_string()),
            Some("abc123".to_string())
        );
    }
}
