mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod screening;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::ResumeAnalyzer;
use crate::config::Config;
use crate::extraction::TextExtractor;
use crate::llm_client::{GenerativeModel, LlmClient};
use crate::routes::build_router;
use crate::screening::orchestrator::BatchOrchestrator;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let llm = LlmClient::new(config.llm.clone())?;
    info!("LLM client initialized (model: {})", llm.model());
    let model: Arc<dyn GenerativeModel> = Arc::new(llm);

    // Build the pipeline
    let orchestrator = BatchOrchestrator::new(
        TextExtractor::new(model.clone()),
        ResumeAnalyzer::new(model, config.prompt_template.clone()),
        config.policy.clone(),
    );
    info!(
        "Batch profile {:?}: max {} resumes, size cap {:?}, pacing {:?}/{:?}",
        config.batch_profile,
        config.policy.max_files,
        config.policy.max_file_bytes,
        config.policy.pause_after_success,
        config.policy.pause_after_failure
    );

    // Build app state
    let state = AppState {
        orchestrator: Arc::new(orchestrator),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
