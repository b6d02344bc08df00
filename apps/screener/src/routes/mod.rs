pub mod health;

use std::any::Any;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::AppError;
use crate::screening::handlers;
use crate::state::AppState;

fn batch_route() -> MethodRouter<AppState> {
    post(handlers::handle_analyze_batch).fallback(handlers::handle_method_not_allowed)
}

fn single_route() -> MethodRouter<AppState> {
    post(handlers::handle_analyze_single).fallback(handlers::handle_method_not_allowed)
}

/// Last-resort boundary: a panic escaping a handler becomes a 500 `{error}` body.
fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unexpected panic".to_string());
    AppError::Internal(anyhow::anyhow!(detail)).into_response()
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Paths kept for existing front-ends
        .route("/analyze", batch_route())
        .route("/analyze/single", single_route())
        // Versioned API
        .route("/api/v1/analyze", batch_route())
        .route("/api/v1/analyze/single", single_route())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}
