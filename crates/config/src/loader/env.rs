//! Environment variable parsing for configuration.
//!
//! Responsibilities:
//! - Read and parse `LOGVIEWER_*` environment variables.
//! - Apply environment variable values to a ConfigLoader instance.
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Returned values are trimmed (leading/trailing whitespace removed).
//! - Invalid numeric values return ConfigError::InvalidValue.

use secrecy::SecretString;
use std::path::PathBuf;
use std::time::Duration;

use super::builder::ConfigLoader;
use super::error::ConfigError;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str, expected: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        var: var.to_string(),
        message: expected.to_string(),
    })
}

/// Split a comma-separated origin list, dropping blanks.
pub(crate) fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Apply environment variable configuration to the loader.
pub fn apply_env(loader: &mut ConfigLoader) -> Result<(), ConfigError> {
    if let Some(url) = env_var_or_none("LOGVIEWER_SEARCH_URL") {
        loader.set_search_url(Some(url));
    }
    if let Some(key) = env_var_or_none("LOGVIEWER_SEARCH_API_KEY") {
        loader.set_api_key(Some(SecretString::new(key.into())));
    }
    if let Some(origins) = env_var_or_none("LOGVIEWER_CORS_ORIGINS") {
        loader.set_cors_origins(Some(split_origins(&origins)));
    }
    if let Some(port) = env_var_or_none("LOGVIEWER_PORT") {
        loader.set_port(Some(parse_number(
            "LOGVIEWER_PORT",
            &port,
            "must be a port number between 0 and 65535",
        )?));
    }
    if let Some(host) = env_var_or_none("LOGVIEWER_BIND") {
        loader.set_host(Some(host));
    }
    if let Some(path) = env_var_or_none("LOGVIEWER_LEDGER_PATH") {
        loader.set_ledger_path(Some(PathBuf::from(path)));
    }
    if let Some(timeout) = env_var_or_none("LOGVIEWER_TIMEOUT") {
        let secs: u64 = parse_number("LOGVIEWER_TIMEOUT", &timeout, "must be a number")?;
        loader.set_timeout(Some(Duration::from_secs(secs)));
    }
    if let Some(retries) = env_var_or_none("LOGVIEWER_MAX_RETRIES") {
        loader.set_max_retries(Some(parse_number(
            "LOGVIEWER_MAX_RETRIES",
            &retries,
            "must be a non-negative integer",
        )?));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_blank_values() {
        temp_env::with_vars(
            [
                ("LOGVIEWER_TEST_BLANK", Some("   ")),
                ("LOGVIEWER_TEST_PADDED", Some("  value  ")),
            ],
            || {
                assert_eq!(env_var_or_none("LOGVIEWER_TEST_BLANK"), None);
                assert_eq!(
                    env_var_or_none("LOGVIEWER_TEST_PADDED"),
                    Some("value".to_string())
                );
                assert_eq!(env_var_or_none("LOGVIEWER_TEST_UNSET_XYZ"), None);
            },
        );
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://a:3000, ,http://b/ "),
            vec!["http://a:3000".to_string(), "http://b".to_string()]
        );
        assert!(split_origins(" , ").is_empty());
    }
}
