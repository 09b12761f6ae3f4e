//! Digest of the demand workflow service.
//!
//! Each line is classified by publisher marker and mined for a fixed table
//! of `name: value` fields. Nothing here fails on odd input; a field that
//! does not appear is simply left out.

use regex::Regex;
use serde::Serialize;

use logviewer_client::LogRecord;

use crate::error::{EngineError, Result};

const CREATE_MARKER: &str = "publishCreateDemandEvent";
const UPDATE_MARKER: &str = "publishUpdateDemandEvent";

/// Fields surfaced in the `details` column of a summary row.
const DETAIL_FIELDS: &[&str] = &["status", "type", "commodity", "sub_status"];

/// (label, pattern) pairs; group 1 of each pattern is the value.
const FIELD_TABLE: &[(&str, &str)] = &[
    ("consigner_user_code", r#"\bconsigner_user_code: "([^"]+)""#),
    ("from_address_id", r"\bfrom_address_id: (\d+)"),
    ("to_address_id", r"\bto_address_id: (\d+)"),
    ("vehicle_type_id", r"\bvehicle_type_id: (\d+)"),
    ("status", r"\bstatus: ([A-Z_]+)"),
    ("type", r"\btype: ([A-Z_]+)"),
    ("commodity", r#"\bcommodity: "([^"]+)""#),
    ("lane", r#"\blane_name: "([^"]+)""#),
    ("comment", r#"\bcomment: "([^"]+)""#),
    ("sub_status", r"\bsub_status: ([A-Z_]+)"),
    ("expiry_remark", r#"\bexpiry_remark: "([^"]+)""#),
    ("remarks", r#"\bremarks: "([^"]+)""#),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Created,
    Updated,
    Other,
}

impl WorkflowEvent {
    pub fn classify(text: &str) -> Self {
        if text.contains(CREATE_MARKER) {
            WorkflowEvent::Created
        } else if text.contains(UPDATE_MARKER) {
            WorkflowEvent::Updated
        } else {
            WorkflowEvent::Other
        }
    }

    /// Label shown in the per-line view.
    pub fn event_type(self) -> &'static str {
        match self {
            WorkflowEvent::Created => "[DemandPublisherService.publishCreateDemandEvent]",
            WorkflowEvent::Updated => "[DemandPublisherService.publishUpdateDemandEvent]",
            WorkflowEvent::Other => "[Event]",
        }
    }

    /// Label shown in the summary table. Only creation is distinguished.
    pub fn row_label(self) -> &'static str {
        match self {
            WorkflowEvent::Created => "Demand Created",
            WorkflowEvent::Updated | WorkflowEvent::Other => "Demand Update",
        }
    }
}

#[derive(Debug, Clone)]
struct FieldRule {
    label: &'static str,
    pattern: Regex,
}

/// Compiled field table.
#[derive(Debug, Clone)]
pub struct WorkflowRules {
    fields: Vec<FieldRule>,
}

impl WorkflowRules {
    pub fn standard() -> Result<Self> {
        let fields = FIELD_TABLE
            .iter()
            .map(|&(label, pattern)| {
                Regex::new(pattern)
                    .map(|regex| FieldRule {
                        label,
                        pattern: regex,
                    })
                    .map_err(|source| EngineError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { fields })
    }

    /// Extract every field present in `text`, in table order.
    pub fn extract<'t>(&self, text: &'t str) -> Vec<(&'static str, &'t str)> {
        self.fields
            .iter()
            .filter_map(|rule| {
                rule.pattern
                    .captures(text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| (rule.label, m.as_str()))
            })
            .collect()
    }

    pub fn format(&self, record: &LogRecord) -> FormattedLog {
        let text = record.text().unwrap_or("");
        FormattedLog {
            time: record.timestamp().unwrap_or("").to_string(),
            event: WorkflowEvent::classify(text),
            fields: self
                .extract(text)
                .into_iter()
                .map(|(label, value)| ExtractedField {
                    label,
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    pub fn summarize_pod(&self, pod: &str, records: &[&LogRecord]) -> WorkflowPodSummary {
        let formatted_logs: Vec<FormattedLog> = records.iter().map(|r| self.format(r)).collect();
        let summary_rows = formatted_logs.iter().map(|f| f.summary_row(pod)).collect();
        WorkflowPodSummary {
            pod: pod.to_string(),
            formatted_logs,
            summary_rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedField {
    pub label: &'static str,
    pub value: String,
}

impl Serialize for ExtractedField {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}: {}", self.label, self.value))
    }
}

/// One workflow line, classified and mined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedLog {
    pub time: String,
    #[serde(rename = "eventType", serialize_with = "serialize_event_type")]
    pub event: WorkflowEvent,
    pub fields: Vec<ExtractedField>,
}

fn serialize_event_type<S: serde::Serializer>(
    event: &WorkflowEvent,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(event.event_type())
}

impl FormattedLog {
    pub fn summary_row(&self, pod: &str) -> SummaryRow {
        let details = self
            .fields
            .iter()
            .filter(|f| DETAIL_FIELDS.contains(&f.label))
            .map(|f| f.value.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        SummaryRow {
            time: row_time(&self.time),
            pod: pod.to_string(),
            event: self.event.row_label().to_string(),
            details,
        }
    }
}

/// `2024-01-01T10:11:12.345Z` becomes `2024-01-01 10:11:12`.
fn row_time(raw: &str) -> String {
    raw.replacen('T', " ", 1).chars().take(19).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub time: String,
    pub pod: String,
    pub event: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPodSummary {
    pub pod: String,
    pub formatted_logs: Vec<FormattedLog>,
    pub summary_rows: Vec<SummaryRow>,
}
