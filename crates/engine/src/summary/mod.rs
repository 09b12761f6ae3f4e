//! Summary view: per-pod digests for the workflow service and its neighbours.
//!
//! Responsibilities:
//! - Search the summary services oldest-first and bucket hits by pod.
//! - Hand each bucket to the digest for the service's role.
//!
//! Does NOT handle:
//! - Error-pattern flagging or ledger writes.
//!
//! Invariants:
//! - Pods appear in first-seen order; records without a pod go to `unknown`.
//! - A failed search yields an empty pod list for that service, never an error.

pub mod adjacent;
pub mod workflow;

use futures::future::join_all;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::warn;

use logviewer_client::{LogRecord, SortOrder};

use crate::engine::LogEngine;
use crate::query::Query;
use crate::services::SummaryRole;

pub use adjacent::AdjacentPodSummary;
pub use workflow::{FormattedLog, SummaryRow, WorkflowEvent, WorkflowPodSummary};

/// Bucket name for records with no pod.
pub const UNKNOWN_POD: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum PodSummary {
    Workflow(WorkflowPodSummary),
    Adjacent(AdjacentPodSummary),
}

impl PodSummary {
    pub fn pod(&self) -> &str {
        match self {
            PodSummary::Workflow(s) => &s.pod,
            PodSummary::Adjacent(s) => &s.pod,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    pub service_key: String,
    pub pods: Vec<PodSummary>,
}

/// Serializes as `{<serviceKey>: [podSummary…], …}` in service order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryReport {
    pub services: Vec<ServiceSummary>,
}

impl SummaryReport {
    pub fn service(&self, service_key: &str) -> Option<&ServiceSummary> {
        self.services.iter().find(|s| s.service_key == service_key)
    }
}

impl Serialize for SummaryReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.services.len()))?;
        for service in &self.services {
            map.serialize_entry(&service.service_key, &service.pods)?;
        }
        map.end()
    }
}

/// Group records by pod, keeping first-seen order.
pub fn group_by_pod(records: &[LogRecord]) -> Vec<(&str, Vec<&LogRecord>)> {
    let mut groups: Vec<(&str, Vec<&LogRecord>)> = Vec::new();
    for record in records {
        let pod = record.pod_name().unwrap_or(UNKNOWN_POD);
        match groups.iter_mut().find(|(name, _)| *name == pod) {
            Some((_, bucket)) => bucket.push(record),
            None => groups.push((pod, vec![record])),
        }
    }
    groups
}

impl LogEngine {
    /// Per-pod digests for every service with a summary role.
    pub async fn summary(&self, query: &Query) -> SummaryReport {
        let request = query.search_request(SortOrder::Asc);
        let services = self.registry().summary_services();

        let summaries = join_all(services.iter().map(|(service, role)| {
            let request = &request;
            async move {
                let records = match self.search(service, request).await {
                    Ok(records) => records,
                    Err(e) => {
                        warn!(service = %service.key, error = %e, "Summary search failed");
                        Vec::new()
                    }
                };
                ServiceSummary {
                    service_key: service.key.clone(),
                    pods: self.summarize(*role, &records),
                }
            }
        }))
        .await;

        SummaryReport { services: summaries }
    }

    fn summarize(&self, role: SummaryRole, records: &[LogRecord]) -> Vec<PodSummary> {
        group_by_pod(records)
            .into_iter()
            .map(|(pod, bucket)| match role {
                SummaryRole::Workflow => {
                    PodSummary::Workflow(self.workflow_rules().summarize_pod(pod, &bucket))
                }
                SummaryRole::Adjacent => {
                    PodSummary::Adjacent(adjacent::summarize_pod(pod, &bucket))
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_group_by_pod_first_seen_order() {
        let records: Vec<LogRecord> = [
            json!({"pod_name": "b", "log": "1"}),
            json!({"pod_name": "a", "log": "2"}),
            json!({"log": "3"}),
            json!({"pod_name": "b", "log": "4"}),
        ]
        .into_iter()
        .filter_map(LogRecord::from_value)
        .collect();

        let groups = group_by_pod(&records);
        let shape: Vec<(&str, usize)> = groups.iter().map(|(pod, b)| (*pod, b.len())).collect();
        assert_eq!(shape, vec![("b", 2), ("a", 1), ("unknown", 1)]);
        assert_eq!(groups[0].1[1].log(), Some("4"));
    }

    #[test]
    fn test_report_serializes_as_keyed_map() {
        let report = SummaryReport {
            services: vec![
                ServiceSummary {
                    service_key: "wfmsLogs".into(),
                    pods: vec![],
                },
                ServiceSummary {
                    service_key: "pricingLogs".into(),
                    pods: vec![PodSummary::Adjacent(AdjacentPodSummary {
                        pod: "pricing-0".into(),
                        count: 0,
                        demand_created: None,
                        quotes: vec![],
                        status_updates: vec![],
                    })],
                },
            ],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["wfmsLogs"], json!([]));
        assert_eq!(value["pricingLogs"][0]["pod"], "pricing-0");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["wfmsLogs", "pricingLogs"]);
    }
}
