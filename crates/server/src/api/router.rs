use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

use super::handlers;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Enrichment endpoints
        .route("/enrich", post(handlers::enrich))
        .route("/enrich/file", post(handlers::enrich_file))
        // Job endpoints
        .route("/jobs", get(handlers::list_jobs))
        .route("/jobs/{id}", get(handlers::get_job))
        .route("/jobs/{id}/fail", post(handlers::fail_job))
        .route("/jobs/{id}/events", get(handlers::job_events))
        .with_state(state)
}
