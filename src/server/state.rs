//! Application state for the matching server

use std::sync::Arc;

use crate::matching::MatchEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    engine: Arc<MatchEngine>,
}

impl AppState {
    pub fn new(engine: MatchEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }
}
