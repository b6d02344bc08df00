use std::sync::Arc;

use crate::config::Config;
use crate::screening::orchestrator::BatchOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Extractor + analyzer + batch policy, built once at startup around the model client.
    pub orchestrator: Arc<BatchOrchestrator>,
    pub config: Config,
}
