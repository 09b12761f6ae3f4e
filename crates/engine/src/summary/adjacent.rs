//! Digest of the services around the workflow: marker lines per pod.

use serde::Serialize;

use logviewer_client::LogRecord;

const INGEST_MARKER: &str = "consumeKafkaPayload";
const DEMAND_MARKER: &str = "demandId";
const QUOTES_MARKER: &str = "Quotes for demandId";
const STATUS_MARKER: &str = "status: DEMAND_STATUS_ENUM";
const MAX_SIGNALS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjacentPodSummary {
    pub pod: String,
    /// All records for the pod, including ones without text.
    pub count: usize,
    pub demand_created: Option<String>,
    pub quotes: Vec<String>,
    pub status_updates: Vec<String>,
}

fn first_matching(lines: &[&str], marker: &str) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.contains(marker))
        .take(MAX_SIGNALS)
        .map(|line| line.to_string())
        .collect()
}

pub fn summarize_pod(pod: &str, records: &[&LogRecord]) -> AdjacentPodSummary {
    let lines: Vec<&str> = records
        .iter()
        .filter_map(|r| r.text())
        .filter(|t| !t.is_empty())
        .collect();

    AdjacentPodSummary {
        pod: pod.to_string(),
        count: records.len(),
        demand_created: lines
            .iter()
            .find(|line| line.contains(INGEST_MARKER) && line.contains(DEMAND_MARKER))
            .map(|line| line.to_string()),
        quotes: first_matching(&lines, QUOTES_MARKER),
        status_updates: first_matching(&lines, STATUS_MARKER),
    }
}
