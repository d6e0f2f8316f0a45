//! Axum route handlers for the assistant API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::assistant::pipeline::{run_query, QueryOutcome};
use crate::assistant::planner::ThinkResponse;
use crate::assistant::summarizer::summarize_results;
use crate::candidates::record::CandidateRecord;
use crate::candidates::stats::AggregateStats;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub query: String,
    pub candidates: Vec<CandidateRecord>,
    pub stats: AggregateStats,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub content: String,
}

fn require_query(query: &str) -> Result<&str, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }
    Ok(query)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/think
///
/// Turns a recruiter query into a filter/rank plan without applying it.
pub async fn handle_think(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<ThinkResponse>, AppError> {
    let query = require_query(&request.query)?;
    let plan = state
        .planner
        .plan(query, &state.dataset.columns(), &state.dataset.csv_header())
        .await?;
    Ok(Json(plan))
}

/// POST /api/v1/speak
///
/// Summarizes an already ranked candidate list.
pub async fn handle_speak(
    State(state): State<AppState>,
    Json(request): Json<SpeakRequest>,
) -> Result<Json<SpeakResponse>, AppError> {
    let query = require_query(&request.query)?;
    let top: Vec<&CandidateRecord> = request
        .candidates
        .iter()
        .take(state.config.summary_top_n)
        .collect();
    let content =
        summarize_results(state.summarizer.as_ref(), query, &top, &request.stats).await?;
    Ok(Json(SpeakResponse { content }))
}

/// POST /api/v1/query
///
/// Full pipeline: plan → filter → rank → aggregate → summarize.
pub async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryOutcome>, AppError> {
    let outcome = run_query(
        &request.query,
        &state.dataset,
        state.planner.as_ref(),
        state.summarizer.as_ref(),
        state.config.summary_top_n,
    )
    .await?;
    Ok(Json(outcome))
}
