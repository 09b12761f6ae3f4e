//! Grouped view: one search per active service.
//!
//! Responsibilities:
//! - Run every active service's search concurrently and join them all.
//! - Isolate failures per service according to its group.
//! - Flag error-looking lines and record mandatory-group failures in the ledger.
//!
//! Does NOT handle:
//! - HTTP mapping of the report (see the server crate).
//!
//! Invariants:
//! - `results` holds exactly one entry per active service, in registry order.
//! - Optional-group failures are logged and otherwise invisible.
//! - A ledger entry exists iff at least one mandatory-group search failed.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use logviewer_client::{LogRecord, SearchRequest, SortOrder};

use crate::engine::LogEngine;
use crate::error::Result;
use crate::ledger::{LedgerEntry, LedgerError};
use crate::query::Query;
use crate::services::ServiceDescriptor;

/// Outcome of one service's search.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResult {
    pub service_key: String,
    pub records: Vec<LogRecord>,
    pub fetch_error: Option<String>,
    /// Records whose text matched an error pattern.
    pub log_level_errors: Vec<LogRecord>,
}

impl ServiceResult {
    fn empty(service: &ServiceDescriptor) -> Self {
        Self {
            service_key: service.key.clone(),
            records: Vec::new(),
            fetch_error: None,
            log_level_errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.fetch_error.is_some() || !self.log_level_errors.is_empty()
    }
}

/// Per-service entry of the response `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBlock {
    pub pod: String,
    pub message: Option<String>,
    #[serde(default)]
    pub log_level_errors: Vec<LogRecord>,
}

/// Wire shape of the grouped view: one array per service key plus `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    #[serde(flatten)]
    pub services: Map<String, Value>,
    pub errors: Vec<ErrorBlock>,
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub results: Vec<ServiceResult>,
    /// The entry appended to the ledger, if any service failed.
    pub ledger_entry: Option<LedgerEntry>,
}

impl FetchReport {
    /// Error blocks for services with a fetch error or flagged lines, in
    /// service order.
    pub fn errors(&self) -> Vec<ErrorBlock> {
        self.results
            .iter()
            .filter(|r| r.has_errors())
            .map(|r| ErrorBlock {
                pod: r.service_key.clone(),
                message: r.fetch_error.clone(),
                log_level_errors: r.log_level_errors.clone(),
            })
            .collect()
    }

    /// Fetch failures only, as recorded in the ledger.
    pub fn fetch_errors(&self) -> Vec<LedgerError> {
        collect_fetch_errors(&self.results)
    }

    pub fn result(&self, service_key: &str) -> Option<&ServiceResult> {
        self.results.iter().find(|r| r.service_key == service_key)
    }

    pub fn into_response(self) -> LogsResponse {
        let errors = self.errors();
        let services = self
            .results
            .into_iter()
            .map(|r| {
                let records = r
                    .records
                    .into_iter()
                    .map(|record| Value::Object(record.into_fields()))
                    .collect();
                (r.service_key, Value::Array(records))
            })
            .collect();
        LogsResponse { services, errors }
    }
}

fn collect_fetch_errors(results: &[ServiceResult]) -> Vec<LedgerError> {
    results
        .iter()
        .filter_map(|r| {
            r.fetch_error.as_ref().map(|message| LedgerError {
                pod: r.service_key.clone(),
                message: message.clone(),
            })
        })
        .collect()
}

impl LogEngine {
    /// Search every active service and collect per-service outcomes.
    ///
    /// Only a ledger write failure fails the whole call; search failures
    /// are folded into the report.
    pub async fn fetch_all(&self, query: &Query) -> Result<FetchReport> {
        let request = query.search_request(SortOrder::Desc);
        let services = self.registry().active(query.include_saas);

        let futures = services
            .iter()
            .map(|service| self.fetch_service(service, &request));
        let results = join_all(futures).await;

        let failures = collect_fetch_errors(&results);
        let ledger_entry = if failures.is_empty() {
            None
        } else {
            Some(
                self.ledger()
                    .record(query.ledger_request(), failures)
                    .await?,
            )
        };

        Ok(FetchReport {
            results,
            ledger_entry,
        })
    }

    async fn fetch_service(
        &self,
        service: &ServiceDescriptor,
        request: &SearchRequest,
    ) -> ServiceResult {
        match self.search(service, request).await {
            Ok(records) => {
                let log_level_errors = self.patterns().extract_errors(&records);
                ServiceResult {
                    service_key: service.key.clone(),
                    records,
                    fetch_error: None,
                    log_level_errors,
                }
            }
            Err(e) if !service.group.reports_failures() => {
                warn!(service = %service.key, error = %e, "Optional service unavailable");
                ServiceResult::empty(service)
            }
            Err(e) => {
                warn!(service = %service.key, error = %e, "Service search failed");
                ServiceResult {
                    fetch_error: Some(e.to_string()),
                    ..ServiceResult::empty(service)
                }
            }
        }
    }
}
