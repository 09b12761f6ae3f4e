//! Log documents returned by the search backend.
//!
//! Documents are schemaless; only a handful of fields are read by the
//! viewer and everything else is passed through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the event time.
pub const TIMESTAMP_FIELD: &str = "@timestamp";
/// Field holding the raw log line.
pub const LOG_FIELD: &str = "log";
/// Fallback text field for shippers that do not populate `log`.
pub const MESSAGE_FIELD: &str = "message";
/// Field holding the emitting pod.
pub const POD_FIELD: &str = "pod_name";

/// One `_source` document from a search hit.
///
/// Serializes back to exactly the JSON object it was read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogRecord(Map<String, Value>);

impl LogRecord {
    /// Wrap an existing JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Convert an arbitrary JSON value, returning `None` for non-objects.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Event time as stored (`@timestamp`, falling back to `timestamp`).
    pub fn timestamp(&self) -> Option<&str> {
        self.str_field(TIMESTAMP_FIELD)
            .or_else(|| self.str_field("timestamp"))
    }

    /// The `log` field.
    pub fn log(&self) -> Option<&str> {
        self.str_field(LOG_FIELD)
    }

    /// The `message` field.
    pub fn message(&self) -> Option<&str> {
        self.str_field(MESSAGE_FIELD)
    }

    /// Free text of the record: `log` when present and non-empty,
    /// otherwise `message`.
    pub fn text(&self) -> Option<&str> {
        self.log()
            .filter(|s| !s.is_empty())
            .or_else(|| self.message())
    }

    /// Emitting pod (`pod_name`, falling back to `podName`).
    pub fn pod_name(&self) -> Option<&str> {
        self.str_field(POD_FIELD)
            .or_else(|| self.str_field("podName"))
    }

    /// Raw field access.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Borrow the underlying JSON object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for LogRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
