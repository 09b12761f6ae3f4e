//! Append-only error ledger.
//!
//! Responsibilities:
//! - Record queries whose mandatory-group searches failed, one JSON object per line.
//! - Read every recorded entry back in file order.
//!
//! Does NOT handle:
//! - Deciding when to record (see `fanout.rs`).
//! - Rotation or size limits. The file grows without bound.
//!
//! Invariants:
//! - Each entry is written with a single `write_all` on an append-mode handle
//!   while holding the ledger's write lock, so lines never interleave.
//! - Timestamps carry millisecond precision, so an entry read back compares
//!   equal to the one written.
//! - A missing file lists as empty; a malformed line fails the whole listing.
//! - Listing holds the write lock, and an unparseable final line with no
//!   trailing newline is treated as an in-flight write and skipped.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::query::DurationUnit;
use crate::serde_helpers::{default_duration, duration_from_string_or_number, unit_from_any_string};

/// Query parameters recorded with a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRequest {
    pub demand_id: String,
    #[serde(
        default = "default_duration",
        deserialize_with = "duration_from_string_or_number"
    )]
    pub duration: u32,
    #[serde(default, deserialize_with = "unit_from_any_string")]
    pub unit: DurationUnit,
}

/// One failed service search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerError {
    /// Service key, e.g. `pricingLogs`.
    pub pod: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub request: LedgerRequest,
    pub errors: Vec<LedgerError>,
}

impl LedgerEntry {
    /// Stamp a new entry with the current instant.
    pub fn new(request: LedgerRequest, errors: Vec<LedgerError>) -> Self {
        Self {
            timestamp: Utc::now().trunc_subsecs(3),
            request,
            errors,
        }
    }
}

fn serialize_millis<S>(timestamp: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Newline-delimited JSON file of [`LedgerEntry`] records.
#[derive(Debug)]
pub struct ErrorLedger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ErrorLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> EngineError {
        EngineError::LedgerIo {
            path: self.path.clone(),
            source,
        }
    }

    /// Append one entry as a single line.
    pub async fn append(&self, entry: &LedgerEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).map_err(EngineError::LedgerEncode)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        debug!(
            path = %self.path.display(),
            demand_id = %entry.request.demand_id,
            failures = entry.errors.len(),
            "Appended error ledger entry"
        );
        Ok(())
    }

    /// Stamp and append an entry, returning it.
    pub async fn record(&self, request: LedgerRequest, errors: Vec<LedgerError>) -> Result<LedgerEntry> {
        let entry = LedgerEntry::new(request, errors);
        self.append(&entry).await?;
        Ok(entry)
    }

    /// Every entry, oldest first.
    pub async fn list_all(&self) -> Result<Vec<LedgerEntry>> {
        let contents = {
            let _guard = self.write_lock.lock().await;
            match tokio::fs::read_to_string(&self.path).await {
                Ok(contents) => contents,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(self.io_error(e)),
            }
        };

        let (complete, tail) = match contents.rfind('\n') {
            Some(end) => contents.split_at(end + 1),
            None => ("", contents.as_str()),
        };

        let mut entries = complete
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|source| EngineError::LedgerParse {
                    line: idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<LedgerEntry>>>()?;

        if !tail.trim().is_empty() {
            match serde_json::from_str(tail) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Skipping unterminated final ledger line"
                ),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request() -> LedgerRequest {
        LedgerRequest {
            demand_id: "D-123".to_string(),
            duration: 1,
            unit: DurationUnit::Hours,
        }
    }

    fn failure(pod: &str) -> LedgerError {
        LedgerError {
            pod: pod.to_string(),
            message: "connection refused".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = TempDir::new().unwrap();
        let ledger = ErrorLedger::new(dir.path().join("error-log.json"));
        assert!(ledger.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let ledger = ErrorLedger::new(dir.path().join("error-log.json"));

        let first = ledger.record(request(), vec![failure("pricingLogs")]).await.unwrap();
        let second = ledger
            .record(request(), vec![failure("odinLogs"), failure("ravenLogs")])
            .await
            .unwrap();

        let entries = ledger.list_all().await.unwrap();
        assert_eq!(entries, vec![first, second]);
    }

    #[tokio::test]
    async fn test_line_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error-log.json");
        let ledger = ErrorLedger::new(&path);
        ledger.record(request(), vec![failure("pricingLogs")]).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with('\n'));
        assert_eq!(contents.lines().count(), 1);

        let value: serde_json::Value = serde_json::from_str(contents.trim_end()).unwrap();
        assert_eq!(
            value["request"],
            serde_json::json!({"demandId": "D-123", "duration": 1, "unit": "hours"})
        );
        assert_eq!(value["errors"][0]["pod"], "pricingLogs");
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.ends_with('Z'), "timestamp {ts}");
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[tokio::test]
    async fn test_reads_legacy_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error-log.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"timestamp":"2024-05-01T10:00:00.000Z","request":{"demandId":"D-1","duration":"6","unit":"minutes"},"errors":[{"pod":"odinLogs","message":"boom"}]}"#,
                "\n\n",
                r#"{"timestamp":"2024-05-01T11:00:00.000Z","request":{"demandId":"D-2"},"errors":[]}"#,
                "\n"
            ),
        )
        .unwrap();

        let entries = ErrorLedger::new(&path).list_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].request.duration, 6);
        assert_eq!(entries[0].request.unit, DurationUnit::Minutes);
        assert_eq!(entries[1].request.duration, 24);
        assert_eq!(entries[1].request.unit, DurationUnit::Hours);
    }

    #[tokio::test]
    async fn test_malformed_line_fails_listing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error-log.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"timestamp":"2024-05-01T10:00:00.000Z","request":{"demandId":"D-1"},"errors":[]}"#,
                "\n{not json\n"
            ),
        )
        .unwrap();

        let err = ErrorLedger::new(&path).list_all().await.unwrap_err();
        assert!(matches!(err, EngineError::LedgerParse { line: 2, .. }));
    }

    #[tokio::test]
    async fn test_unterminated_final_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("error-log.json");
        let complete = r#"{"timestamp":"2024-05-01T10:00:00.000Z","request":{"demandId":"D-1"},"errors":[]}"#;

        std::fs::write(&path, format!("{complete}\n{{\"timestamp\":\"2024-05-01T11")).unwrap();
        let entries = ErrorLedger::new(&path).list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].request.demand_id, "D-1");

        std::fs::write(&path, format!("{complete}\n{complete}")).unwrap();
        let entries = ErrorLedger::new(&path).list_all().await.unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn test_listing_during_appends_sees_whole_entries() {
        let dir = TempDir::new().unwrap();
        let ledger = std::sync::Arc::new(ErrorLedger::new(dir.path().join("error-log.json")));

        let writer = {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                for i in 0..32 {
                    let mut req = request();
                    req.demand_id = format!("D-{i}");
                    ledger.record(req, vec![failure("pricingLogs")]).await.unwrap();
                }
            })
        };

        let mut seen = 0;
        while !writer.is_finished() {
            let entries = ledger.list_all().await.unwrap();
            assert!(entries.len() >= seen);
            for (i, entry) in entries.iter().enumerate() {
                assert_eq!(entry.request.demand_id, format!("D-{i}"));
            }
            seen = entries.len();
            tokio::task::yield_now().await;
        }
        writer.await.unwrap();
        assert_eq!(ledger.list_all().await.unwrap().len(), 32);
    }

    #[tokio::test]
    async fn test_concurrent_appends_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let ledger = std::sync::Arc::new(ErrorLedger::new(dir.path().join("error-log.json")));

        let mut handles = Vec::new();
        for i in 0..16 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                let mut req = request();
                req.demand_id = format!("D-{i}");
                ledger.record(req, vec![failure("pricingLogs")]).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let entries = ledger.list_all().await.unwrap();
        assert_eq!(entries.len(), 16);
    }
}
