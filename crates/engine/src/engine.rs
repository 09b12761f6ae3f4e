use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use logviewer_client::{LogRecord, SearchBackend, SearchRequest};

use crate::error::Result;
use crate::ledger::ErrorLedger;
use crate::patterns::ErrorPatterns;
use crate::services::{ServiceDescriptor, ServiceRegistry};
use crate::summary::workflow::WorkflowRules;

/// Entry point for every log view.
///
/// Holds only immutable configuration plus the ledger, so one instance is
/// shared across all concurrent requests.
pub struct LogEngine {
    backend: Arc<dyn SearchBackend>,
    registry: ServiceRegistry,
    patterns: ErrorPatterns,
    workflow: WorkflowRules,
    ledger: ErrorLedger,
}

impl LogEngine {
    /// Engine over the standard service table and pattern lists.
    pub fn new(backend: Arc<dyn SearchBackend>, ledger: ErrorLedger) -> Result<Self> {
        Ok(Self {
            backend,
            registry: ServiceRegistry::standard(),
            patterns: ErrorPatterns::standard()?,
            workflow: WorkflowRules::standard()?,
            ledger,
        })
    }

    /// Replace the service table.
    pub fn with_registry(mut self, registry: ServiceRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the error pattern list.
    pub fn with_patterns(mut self, patterns: ErrorPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn patterns(&self) -> &ErrorPatterns {
        &self.patterns
    }

    pub(crate) fn workflow_rules(&self) -> &WorkflowRules {
        &self.workflow
    }

    pub fn ledger(&self) -> &ErrorLedger {
        &self.ledger
    }

    pub(crate) async fn search(
        &self,
        service: &ServiceDescriptor,
        request: &SearchRequest,
    ) -> logviewer_client::Result<Vec<LogRecord>> {
        let start = Instant::now();
        let result = self.backend.search(&service.index_pattern, request).await;
        debug!(
            service = %service.key,
            index = %service.index_pattern,
            since = %request.since,
            order = %request.order,
            ok = result.is_ok(),
            hits = result.as_ref().map(Vec::len).unwrap_or(0),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Service search finished"
        );
        result
    }
}

impl std::fmt::Debug for LogEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogEngine")
            .field("services", &self.registry.all().len())
            .field("patterns", &self.patterns.patterns().len())
            .field("ledger", &self.ledger.path())
            .finish()
    }
}
