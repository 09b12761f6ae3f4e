//! Centralized constants for the log viewer workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Search Backend Defaults
// =============================================================================

/// Default search backend endpoint.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Default per-call HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed per-call timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Maximum allowed retries.
pub const MAX_MAX_RETRIES: usize = 10;

/// Hard cap on hits returned per service search.
pub const MAX_SEARCH_RESULTS: u32 = 10_000;

// =============================================================================
// Query Defaults
// =============================================================================

/// Lookback applied when the requested duration is missing or not a positive integer.
pub const DEFAULT_DURATION_VALUE: u32 = 24;

// =============================================================================
// Server Defaults
// =============================================================================

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 4000;

/// Default HTTP listen host.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default cross-origin callers (local UI dev servers).
pub const DEFAULT_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://localhost:3001"];

/// Default error ledger location, relative to the working directory.
pub const DEFAULT_LEDGER_PATH: &str = "error-log.json";
