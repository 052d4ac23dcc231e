//! Service description, health and rubric inspection endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use speechscore_rubric::RubricCriterion;

use crate::state::SharedState;

pub const INDEX_MESSAGE: &str = "Speech Scorer API. POST /score with JSON {transcript: '...'}";

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub msg: &'static str,
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse { msg: INDEX_MESSAGE })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub criteria: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_loaded: Option<bool>,
    /// Hub id of the loaded model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<bool>,
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let service = state.embedding.as_deref();
    let model = service.and_then(|s| s.loaded());
    Json(HealthResponse {
        status: "ok",
        criteria: state.engine.rubric().len(),
        model_loaded: service.map(|s| s.is_loaded()),
        model: model.map(|m| m.model_name().to_string()),
        gpu: model.map(|m| m.is_gpu()),
    })
}

#[derive(Debug, Serialize)]
pub struct RubricSummary {
    pub total_weight: f64,
    pub criteria: Vec<RubricCriterion>,
}

/// GET /rubric: criteria as loaded, without their embeddings.
pub async fn rubric_summary(State(state): State<SharedState>) -> Json<RubricSummary> {
    let rubric = state.engine.rubric();
    Json(RubricSummary {
        total_weight: rubric.total_weight(),
        criteria: rubric.criteria().to_vec(),
    })
}
