//! Search request body and response envelope.
//!
//! The request contract is deliberately narrow: a full-text match of one
//! keyword against the `log` field, a relative lower time bound on
//! `@timestamp`, a single timestamp sort and a fixed hit cap.

use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;

use super::log_record::{LOG_FIELD, LogRecord, TIMESTAMP_FIELD};
use logviewer_config::constants::MAX_SEARCH_RESULTS;

/// Sort direction on `@timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Desc,
    /// Oldest first.
    Asc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Desc => write!(f, "desc"),
            SortOrder::Asc => write!(f, "asc"),
        }
    }
}

/// A keyword-within-time-window search against one index pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Text matched against the `log` field.
    pub keyword: String,
    /// Lower bound in date-math form, e.g. `now-24h`.
    pub since: String,
    pub order: SortOrder,
    pub size: u32,
}

impl SearchRequest {
    /// Build a request with the standard hit cap.
    pub fn new(keyword: impl Into<String>, since: impl Into<String>, order: SortOrder) -> Self {
        Self {
            keyword: keyword.into(),
            since: since.into(),
            order,
            size: MAX_SEARCH_RESULTS,
        }
    }

    /// JSON body sent to `/{index}/_search`.
    pub fn body(&self) -> Value {
        json!({
            "size": self.size,
            "query": {
                "bool": {
                    "must": [
                        { "match": { LOG_FIELD: self.keyword } },
                        { "range": { TIMESTAMP_FIELD: { "gte": self.since } } }
                    ]
                }
            },
            "sort": [ { TIMESTAMP_FIELD: self.order.to_string() } ]
        })
    }
}

/// One hit in a search response.
#[derive(Debug, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_source", default)]
    pub source: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct HitsWrapper {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

/// Search response envelope; only `hits.hits[]._source` is read.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    hits: HitsWrapper,
}

impl SearchResponse {
    /// Number of hits in the envelope, including any without an object source.
    pub fn hit_count(&self) -> usize {
        self.hits.hits.len()
    }

    /// Extract the source documents, skipping hits whose `_source` is missing
    /// or not a JSON object.
    pub fn into_records(self) -> Vec<LogRecord> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source.and_then(LogRecord::from_value))
            .collect()
    }
}
