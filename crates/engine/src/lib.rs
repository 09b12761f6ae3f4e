//! Fan-out, merge, summary and error-ledger logic for the demand log viewer.
//!
//! A [`LogEngine`] owns the immutable service table, the error pattern list,
//! a [`SearchBackend`](logviewer_client::SearchBackend) and the
//! [`ErrorLedger`]. Each public operation lives in its own module as an
//! `impl LogEngine` block:
//!
//! - [`fanout`]: one search per active service, failures isolated per service
//! - [`merge`]: one timestamp-ordered timeline across a service group
//! - [`summary`]: per-pod digests for the workflow service and its neighbours
//! - [`recheck`]: replay of a query recorded in the ledger

mod engine;
pub mod error;
pub mod fanout;
pub mod ledger;
pub mod merge;
pub mod patterns;
pub mod query;
pub mod recheck;
mod serde_helpers;
pub mod services;
pub mod summary;

pub use engine::LogEngine;
pub use error::{EngineError, Result};
pub use fanout::{ErrorBlock, FetchReport, LogsResponse, ServiceResult};
pub use ledger::{ErrorLedger, LedgerEntry, LedgerError, LedgerRequest};
pub use merge::MergedLogEntry;
pub use patterns::ErrorPatterns;
pub use query::{DurationUnit, Query};
pub use recheck::RecheckStatus;
pub use services::{ServiceDescriptor, ServiceGroup, ServiceRegistry, SummaryRole};
pub use summary::{PodSummary, SummaryReport};
