//! Configuration management for the demand log viewer.
//!
//! This crate provides types and loaders for the search backend connection,
//! the HTTP listener, and the error ledger location, sourced from `.env`
//! files and environment variables.

pub mod constants;
mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, env_var_or_none};
pub use types::{Config, SearchConfig, ServerConfig};
