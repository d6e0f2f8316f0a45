pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assistant::handlers as assistant;
use crate::candidates::handlers as candidates;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Candidate API
        .route("/api/v1/candidates", get(candidates::handle_list_candidates))
        .route("/api/v1/candidates/schema", get(candidates::handle_schema))
        .route("/api/v1/candidates/search", post(candidates::handle_search))
        .route("/api/v1/candidates/:id", get(candidates::handle_get_candidate))
        // Assistant API
        .route("/api/v1/think", post(assistant::handle_think))
        .route("/api/v1/speak", post(assistant::handle_speak))
        .route("/api/v1/query", post(assistant::handle_query))
        .with_state(state)
}
