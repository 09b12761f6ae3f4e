use std::sync::Arc;

use logviewer_engine::LogEngine;

/// Shared, read-only handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub engine: Arc<LogEngine>,
}

impl AppState {
    pub fn new(engine: LogEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
