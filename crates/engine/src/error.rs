//! Error types for the engine.
//!
//! Per-service search failures are NOT represented here: they are isolated
//! into [`crate::ServiceResult::fetch_error`] and never abort a request.
//! These variants are the whole-request failures.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The demand ID was missing or blank.
    #[error("demandId is required")]
    MissingDemandId,

    /// Two services share a key, or the table is otherwise unusable.
    #[error("Invalid service registry: {0}")]
    InvalidRegistry(String),

    /// An error pattern failed to compile.
    #[error("Invalid error pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The ledger file could not be read or written.
    #[error("Error ledger I/O failed at {path}: {source}")]
    LedgerIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ledger line was not a valid entry.
    #[error("Error ledger line {line} is malformed: {source}")]
    LedgerParse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// An entry could not be encoded.
    #[error("Failed to encode ledger entry: {0}")]
    LedgerEncode(#[source] serde_json::Error),
}

impl EngineError {
    /// Whether the caller supplied bad input (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingDemandId)
    }
}
