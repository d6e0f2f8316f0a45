use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::candidates::diagnostics::Diagnostic;
use crate::candidates::filter::FilterPlan;
use crate::candidates::rank::RankPlan;
use crate::candidates::record::CandidateRecord;
use crate::candidates::schema::ColumnInfo;
use crate::candidates::search::{search, SearchResult};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CandidateListResponse {
    pub count: usize,
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Serialize)]
pub struct SchemaResponse {
    pub csv_header: String,
    pub columns: Vec<ColumnInfo>,
    /// Warnings raised while loading the dataset.
    pub load_diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub filter: FilterPlan,
    #[serde(default)]
    pub rank: RankPlan,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<CandidateListResponse> {
    Json(CandidateListResponse {
        count: state.dataset.len(),
        candidates: state.dataset.records.clone(),
    })
}

/// GET /api/v1/candidates/schema
pub async fn handle_schema(State(state): State<AppState>) -> Json<SchemaResponse> {
    Json(SchemaResponse {
        csv_header: state.dataset.csv_header(),
        columns: state.dataset.columns(),
        load_diagnostics: state.dataset.diagnostics.iter().cloned().collect(),
    })
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateRecord>, AppError> {
    state
        .dataset
        .find(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// POST /api/v1/candidates/search
///
/// Applies a caller-supplied plan directly, without the planner.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result: SearchResult<'_> = search(&state.dataset.records, &request.filter, &request.rank);
    let body = serde_json::to_value(&result).map_err(anyhow::Error::from)?;
    Ok(Json(body))
}
