mod assistant;
mod candidates;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::planner::LlmQueryPlanner;
use crate::assistant::summarizer::{LlmSummarizer, Summarizer, TemplateSummarizer};
use crate::candidates::dataset::Dataset;
use crate::candidates::schema::CandidateSchema;
use crate::config::{Config, SummaryBackend};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS-Lite API v{}", env!("CARGO_PKG_VERSION"));

    // Candidate dataset is parsed once and shared read-only
    let dataset = Dataset::load(&config.candidates_csv, CandidateSchema::default())?;
    if dataset.is_empty() {
        tracing::warn!("Candidate dataset '{}' has no rows", config.candidates_csv);
    }

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let summarizer: Arc<dyn Summarizer> = match config.summary_backend {
        SummaryBackend::Llm => Arc::new(LlmSummarizer(llm.clone())),
        SummaryBackend::Template => Arc::new(TemplateSummarizer),
    };
    info!("Summary backend: {}", summarizer.backend());

    // Build app state
    let state = AppState {
        dataset: Arc::new(dataset),
        planner: Arc::new(LlmQueryPlanner(llm)),
        summarizer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
