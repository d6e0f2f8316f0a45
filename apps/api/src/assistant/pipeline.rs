//! End-to-end query: plan → filter → rank → summarize.
//!
//! Phases are recorded as a timeline so the UI can show progress after the
//! fact. Only the planner and summarizer suspend; the engine steps in
//! between are synchronous.

use serde::Serialize;
use tracing::info;

use crate::assistant::planner::{QueryPlanner, ThinkResponse};
use crate::assistant::summarizer::{summarize_results, Summarizer};
use crate::candidates::dataset::Dataset;
use crate::candidates::diagnostics::Diagnostic;
use crate::candidates::record::CandidateRecord;
use crate::candidates::search::search;
use crate::candidates::stats::AggregateStats;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Think,
    Filter,
    Rank,
    Speak,
    Complete,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseEvent {
    pub phase: Phase,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub query: String,
    pub plan: ThinkResponse,
    pub phases: Vec<PhaseEvent>,
    pub filtered_count: usize,
    /// All filtered candidates in ranked order.
    pub candidates: Vec<CandidateRecord>,
    pub stats: AggregateStats,
    pub summary: String,
    pub summary_backend: &'static str,
    pub diagnostics: Vec<Diagnostic>,
}

pub async fn run_query(
    query: &str,
    dataset: &Dataset,
    planner: &dyn QueryPlanner,
    summarizer: &dyn Summarizer,
    top_n: usize,
) -> Result<QueryOutcome, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let mut phases = Vec::new();
    let mut mark = |phase: Phase, detail: String| {
        info!(?phase, "{detail}");
        phases.push(PhaseEvent { phase, detail });
    };

    let plan = planner
        .plan(query, &dataset.columns(), &dataset.csv_header())
        .await?;
    mark(
        Phase::Think,
        format!(
            "Planned {} include and {} exclude criteria",
            plan.filter.include.len(),
            plan.filter.exclude.len()
        ),
    );

    let result = search(&dataset.records, &plan.filter, &plan.rank);
    mark(
        Phase::Filter,
        format!(
            "{} of {} candidates matched",
            result.filtered_count,
            dataset.len()
        ),
    );
    mark(
        Phase::Rank,
        match &plan.rank.primary {
            Some(key) => format!("Ranked by {}", key.field),
            None => "Kept dataset order".to_string(),
        },
    );

    let top: Vec<&CandidateRecord> = result.candidates.iter().take(top_n).copied().collect();
    let summary = summarize_results(summarizer, query, &top, &result.stats).await?;
    mark(
        Phase::Speak,
        format!("Summarized top {} candidates", top.len()),
    );
    mark(Phase::Complete, "Done".to_string());

    Ok(QueryOutcome {
        query: query.to_string(),
        filtered_count: result.filtered_count,
        candidates: result.candidates.into_iter().cloned().collect(),
        stats: result.stats,
        summary,
        summary_backend: summarizer.backend(),
        diagnostics: result.diagnostics.into_vec(),
        phases,
        plan,
    })
}
