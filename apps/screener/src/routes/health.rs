use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and active batch limits.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let policy = state.orchestrator.policy();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "screener",
        "model": state.config.llm.model,
        "max_resumes": policy.max_files,
    }))
}
