//! Replay of a recorded failing query.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::LogEngine;
use crate::fanout::ErrorBlock;
use crate::ledger::LedgerRequest;
use crate::query::Query;

/// Result of re-running a ledger entry's query.
///
/// The window is relative to now, so a replay long after the failure can
/// report `fixed` only because the matching lines aged out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecheckStatus {
    /// No fetch failures and no flagged lines.
    Fixed,
    Error { errors: Vec<ErrorBlock> },
    /// The replay itself could not run.
    Exception { message: String },
}

impl RecheckStatus {
    pub fn is_fixed(&self) -> bool {
        matches!(self, RecheckStatus::Fixed)
    }
}

impl LogEngine {
    /// Re-run the grouped view for a recorded request.
    ///
    /// A replay that still fails appends a fresh ledger entry, like any
    /// other grouped-view request.
    pub async fn recheck(&self, request: &LedgerRequest) -> RecheckStatus {
        let outcome = match Query::from_ledger(request) {
            Ok(query) => self.fetch_all(&query).await,
            Err(e) => Err(e),
        };

        let status = match outcome {
            Ok(report) => {
                let errors = report.errors();
                if errors.is_empty() {
                    RecheckStatus::Fixed
                } else {
                    RecheckStatus::Error { errors }
                }
            }
            Err(e) => RecheckStatus::Exception {
                message: e.to_string(),
            },
        };

        info!(
            demand_id = %request.demand_id,
            fixed = status.is_fixed(),
            "Rechecked ledger entry"
        );
        status
    }
}
