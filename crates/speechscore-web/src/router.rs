//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    system::{index, health, rubric_summary},
    score::{score, score_file},
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState, cors_permissive: bool) -> Router {
    let shared: SharedState = Arc::new(state);

    let router = Router::new()
        .route("/",           get(index))
        .route("/health",     get(health))
        .route("/rubric",     get(rubric_summary))
        .route("/score",      post(score))
        .route("/score-file", post(score_file))

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let router = if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(shared)
}
