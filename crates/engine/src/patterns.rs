//! Error-pattern extraction over log text.
//!
//! Responsibilities:
//! - Hold the ordered, case-insensitive set of error patterns.
//! - Select the records whose free text matches any of them.
//!
//! Does NOT handle:
//! - Transport failures (see `ServiceResult::fetch_error`).
//!
//! Invariants:
//! - Pure: no I/O, no state. Output preserves input order and never
//!   duplicates a record, so re-running on its own output is a no-op.

use regex::{RegexSet, RegexSetBuilder};

use logviewer_client::LogRecord;

use crate::error::{EngineError, Result};

/// Patterns flagging a log line as an application-level error.
pub const STANDARD_ERROR_PATTERNS: &[&str] = &[
    r"ERROR",
    r"500\s+INTERNAL_SERVER_ERROR",
    r"Exception",
    r"Internal Server Error",
    r"e-500\s+Internal Server Error",
    r#"status":500"#,
    r#"error":"Internal Server Error""#,
];

#[derive(Debug, Clone)]
pub struct ErrorPatterns {
    set: RegexSet,
}

impl ErrorPatterns {
    /// Compile a pattern list. Matching is case-insensitive.
    pub fn new(patterns: &[&str]) -> Result<Self> {
        let set = RegexSetBuilder::new(patterns)
            .case_insensitive(true)
            .build()
            .map_err(|source| EngineError::InvalidPattern {
                pattern: patterns.join(" | "),
                source,
            })?;
        Ok(Self { set })
    }

    /// The production pattern list.
    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_ERROR_PATTERNS)
    }

    pub fn patterns(&self) -> &[String] {
        self.set.patterns()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.set.is_match(text)
    }

    /// Whether a record's `log` (or, when `log` is absent or empty, its
    /// `message`) matches any pattern.
    pub fn matches(&self, record: &LogRecord) -> bool {
        self.is_match(record.text().unwrap_or(""))
    }

    /// Records that match at least one pattern, in input order.
    pub fn extract_errors(&self, records: &[LogRecord]) -> Vec<LogRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
