//! HTTP boundary for the demand log viewer.
//!
//! Responsibilities:
//! - Map query strings onto engine queries and engine results onto JSON.
//! - Apply CORS and request tracing.
//!
//! Does NOT handle:
//! - Search, merge, summary or ledger logic (see `logviewer-engine`).
//! - Process bootstrap (see `main.rs`).

pub mod error;
mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{app, cors_layer};
pub use state::AppState;
