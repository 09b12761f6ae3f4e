//! Shared fixtures for engine integration tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(unused_imports)]
pub use logviewer_client::{ClientError, LogRecord, SearchBackend, SearchRequest, SortOrder};
#[allow(unused_imports)]
pub use logviewer_engine::{
    DurationUnit, ErrorLedger, LogEngine, Query, RecheckStatus, ServiceGroup,
};

enum Canned {
    Hits(Vec<Value>),
    Refused(String),
}

/// In-memory backend keyed by index pattern. Unknown patterns return no hits.
#[derive(Default)]
pub struct FakeBackend {
    responses: HashMap<String, Canned>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(String, SearchRequest)>>,
    completed: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, index_pattern: &str, sources: Vec<Value>) -> Self {
        self.responses
            .insert(index_pattern.to_string(), Canned::Hits(sources));
        self
    }

    pub fn with_refused(mut self, index_pattern: &str, target: &str) -> Self {
        self.responses
            .insert(index_pattern.to_string(), Canned::Refused(target.to_string()));
        self
    }

    /// Answer `index_pattern` only after `delay`.
    pub fn with_delay(mut self, index_pattern: &str, delay: Duration) -> Self {
        self.delays.insert(index_pattern.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<(String, SearchRequest)> {
        self.calls.lock().unwrap().clone()
    }

    /// Index patterns in the order their searches finished.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchBackend for FakeBackend {
    async fn search(
        &self,
        index_pattern: &str,
        request: &SearchRequest,
    ) -> logviewer_client::Result<Vec<LogRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((index_pattern.to_string(), request.clone()));

        if let Some(delay) = self.delays.get(index_pattern) {
            tokio::time::sleep(*delay).await;
        }
        self.completed
            .lock()
            .unwrap()
            .push(index_pattern.to_string());

        match self.responses.get(index_pattern) {
            Some(Canned::Hits(sources)) => Ok(sources
                .iter()
                .cloned()
                .filter_map(LogRecord::from_value)
                .collect()),
            Some(Canned::Refused(target)) => Err(ClientError::ConnectionRefused(target.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Engine over `backend` with a ledger in `dir`.
#[allow(dead_code)]
pub fn engine(backend: Arc<FakeBackend>, dir: &Path) -> LogEngine {
    LogEngine::new(backend, ErrorLedger::new(dir.join("error-log.json"))).unwrap()
}
