//! Search backend client for the demand log viewer.
//!
//! This crate provides a type-safe client for the keyword-and-time-range
//! search API exposed by the log store. Each configured service maps to an
//! index pattern; a search returns the raw `_source` documents as
//! [`LogRecord`]s.

mod backend;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod metrics;
pub mod metrics_exporter;
pub mod models;

pub use backend::SearchBackend;
pub use client::SearchClient;
pub use client::builder::SearchClientBuilder;
pub use error::{ClientError, Result};
pub use metrics::{ErrorCategory, MetricsCollector};
pub use metrics_exporter::{MetricsExporter, MetricsExporterError};
pub use models::{LogRecord, SearchRequest, SortOrder};
