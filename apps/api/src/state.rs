use std::sync::Arc;

use crate::assistant::planner::QueryPlanner;
use crate::assistant::summarizer::Summarizer;
use crate::candidates::dataset::Dataset;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Parsed once at startup; never mutated.
    pub dataset: Arc<Dataset>,
    /// Pluggable query planner. Default: LlmQueryPlanner.
    pub planner: Arc<dyn QueryPlanner>,
    /// Pluggable summarizer. Picked by SUMMARY_BACKEND.
    pub summarizer: Arc<dyn Summarizer>,
    pub config: Config,
}
