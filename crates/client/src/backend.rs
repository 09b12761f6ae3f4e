//! The seam between the fan-out engine and the search transport.

use async_trait::async_trait;

use crate::client::SearchClient;
use crate::error::Result;
use crate::models::{LogRecord, SearchRequest};

/// Anything that can run a keyword-within-time-window search on a named
/// index pattern.
///
/// Implemented by [`SearchClient`] for the real backend; tests substitute
/// in-memory doubles.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, index_pattern: &str, request: &SearchRequest)
    -> Result<Vec<LogRecord>>;
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(
        &self,
        index_pattern: &str,
        request: &SearchRequest,
    ) -> Result<Vec<LogRecord>> {
        self.search_index(index_pattern, request).await
    }
}
