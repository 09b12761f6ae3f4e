//! Merged view: one timeline across a service group.
//!
//! Every failure degrades to an empty contribution from that service; the
//! caller only ever sees a (possibly gappy) timeline.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::warn;

use logviewer_client::{LogRecord, SortOrder};

use crate::engine::LogEngine;
use crate::query::Query;

/// A log line projected for the merged view, tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    #[serde(rename = "@timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
    /// Short service name, e.g. `pricing`.
    pub source: String,
}

impl MergedLogEntry {
    pub fn project(record: &LogRecord, source: &str) -> Self {
        Self {
            log: record.text().map(str::to_string),
            timestamp: record.timestamp().map(str::to_string),
            pod_name: record.pod_name().map(str::to_string),
            source: source.to_string(),
        }
    }

    fn instant(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339, a colonless numeric offset (`+0000`), a naive
/// date-time (read as UTC) and a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Sort newest first. Stable, and unparseable timestamps sort last.
pub fn merge_sorted(mut entries: Vec<MergedLogEntry>) -> Vec<MergedLogEntry> {
    entries.sort_by_cached_key(|entry| Reverse(entry.instant()));
    entries
}

impl LogEngine {
    /// One newest-first timeline across the query's selected group.
    pub async fn merge(&self, query: &Query) -> Vec<MergedLogEntry> {
        let request = query.search_request(SortOrder::Desc);
        let services = self.registry().group(query.group);

        let contributions = join_all(services.iter().map(|service| {
            let request = &request;
            async move {
                match self.search(service, request).await {
                    Ok(records) => records
                        .iter()
                        .map(|record| MergedLogEntry::project(record, &service.name))
                        .collect(),
                    Err(e) => {
                        warn!(service = %service.key, error = %e, "Omitting service from merged view");
                        Vec::new()
                    }
                }
            }
        }))
        .await;

        merge_sorted(contributions.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(ts: Option<&str>, source: &str, log: &str) -> MergedLogEntry {
        MergedLogEntry {
            log: Some(log.to_string()),
            timestamp: ts.map(str::to_string),
            pod_name: None,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let merged = merge_sorted(vec![
            entry(Some("2024-01-01T00:00:01Z"), "wfms", "t1"),
            entry(Some("2024-01-01T00:00:00Z"), "wfms", "t2"),
            entry(Some("2024-01-01T00:00:05Z"), "odin", "t3"),
        ]);
        let logs: Vec<_> = merged.iter().map(|e| e.log.as_deref().unwrap()).collect();
        assert_eq!(logs, vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let merged = merge_sorted(vec![
            entry(Some("2024-01-01T00:00:00Z"), "wfms", "a"),
            entry(Some("2024-01-01T00:00:00.000+00:00"), "pricing", "b"),
            entry(Some("2024-01-01T00:00:00Z"), "odin", "c"),
        ]);
        let sources: Vec<_> = merged.iter().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["wfms", "pricing", "odin"]);
    }

    #[test]
    fn test_unparseable_timestamps_sort_last() {
        let merged = merge_sorted(vec![
            entry(Some("not a time"), "wfms", "bad"),
            entry(None, "wfms", "missing"),
            entry(Some("1970-01-01T00:00:00Z"), "odin", "epoch"),
        ]);
        let logs: Vec<_> = merged.iter().map(|e| e.log.as_deref().unwrap()).collect();
        assert_eq!(logs, vec!["epoch", "bad", "missing"]);
    }

    #[test]
    fn test_colonless_offset_sorts_by_instant() {
        let merged = merge_sorted(vec![
            entry(Some("2024-01-01T00:00:00Z"), "wfms", "older"),
            entry(Some("2024-01-02T00:00:00.000+0000"), "pricing", "newer"),
        ]);
        let logs: Vec<_> = merged.iter().map(|e| e.log.as_deref().unwrap()).collect();
        assert_eq!(logs, vec!["newer", "older"]);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = parse_timestamp("2024-03-04T05:06:07Z").unwrap();
        assert_eq!(parse_timestamp("2024-03-04T07:06:07+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-04T05:06:07"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-04T05:06:07.000+0000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-04T07:06:07+0200"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-04 05:06:07"), Some(expected));
        assert!(parse_timestamp("2024-03-04").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_projection_and_wire_names() {
        let record = LogRecord::from_value(serde_json::json!({
            "@timestamp": "2024-01-01T00:00:00Z",
            "log": "hello",
            "pod_name": "pricing-7f9",
            "kubernetes": {"ns": "prod"}
        }))
        .unwrap();
        let value = serde_json::to_value(MergedLogEntry::project(&record, "pricing")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "log": "hello",
                "@timestamp": "2024-01-01T00:00:00Z",
                "pod_name": "pricing-7f9",
                "source": "pricing"
            })
        );
    }

    #[test]
    fn test_projection_falls_back_to_message_for_empty_log() {
        let record = LogRecord::from_value(serde_json::json!({
            "@timestamp": "2024-01-01T00:00:00Z",
            "log": "",
            "message": "from message"
        }))
        .unwrap();
        let entry = MergedLogEntry::project(&record, "odin");
        assert_eq!(entry.log.as_deref(), Some("from message"));
    }

    fn arb_timestamp() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            4 => (0i64..2_000_000_000).prop_map(|secs| {
                DateTime::from_timestamp(secs, 0).map(|ts| ts.to_rfc3339())
            }),
            1 => Just(Some("garbage".to_string())),
            1 => Just(None),
        ]
    }

    proptest! {
        #[test]
        fn prop_merge_is_non_increasing_and_deterministic(
            stamps in prop::collection::vec(arb_timestamp(), 0..40)
        ) {
            let entries: Vec<_> = stamps
                .iter()
                .enumerate()
                .map(|(i, ts)| entry(ts.as_deref(), "wfms", &i.to_string()))
                .collect();

            let merged = merge_sorted(entries.clone());
            prop_assert_eq!(merged.len(), entries.len());
            for pair in merged.windows(2) {
                prop_assert!(pair[0].instant() >= pair[1].instant());
            }
            prop_assert_eq!(merge_sorted(entries), merged.clone());
            prop_assert_eq!(merge_sorted(merged.clone()), merged);
        }
    }
}
