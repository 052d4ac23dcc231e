//! HTTP error type. Every failure becomes a JSON body `{"error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use speechscore_rubric::ScoringError;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Scoring task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Scoring(ScoringError::EmptyRubric)
            | ApiError::Scoring(ScoringError::InvalidWeights(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Scoring(ScoringError::Embedding(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{message}");
        } else {
            warn!(status = status.as_u16(), "{message}");
        }

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
