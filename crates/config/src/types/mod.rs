//! Configuration type definitions.
//!
//! Responsibilities:
//! - Define the search backend connection settings.
//! - Define the HTTP listener settings.
//! - Combine both with the ledger location into the top-level `Config`.
//!
//! Does NOT handle:
//! - Loading from files or environment variables (see `loader` module).
//! - Actual network connections (see client crate).
//!
//! Invariants:
//! - The search API key is held as `secrecy::SecretString` and never printed.

mod search;
mod server;

pub use search::SearchConfig;
pub use server::ServerConfig;

use std::path::PathBuf;

/// Fully resolved configuration for one server process.
#[derive(Debug, Clone)]
pub struct Config {
    pub search: SearchConfig,
    pub server: ServerConfig,
    /// Append-only error ledger file.
    pub ledger_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            server: ServerConfig::default(),
            ledger_path: PathBuf::from(crate::constants::DEFAULT_LEDGER_PATH),
        }
    }
}
