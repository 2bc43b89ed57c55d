//! Application state shared across handlers.

use std::sync::Arc;

use songbird_orchestrator::Orchestrator;

use crate::config::ApiConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Conversation loop shared by every request.
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Creates a new AppState.
    pub fn new(config: ApiConfig, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator,
        }
    }
}
