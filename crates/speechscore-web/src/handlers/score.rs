//! Transcript scoring endpoints.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;
use speechscore_rubric::{ComponentWeights, ScoringResult};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SharedState;

/// Multipart field holding the uploaded transcript.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub transcript: String,
    #[serde(default)]
    pub weights: Option<ComponentWeights>,
}

/// POST /score
pub async fn score(
    State(state): State<SharedState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoringResult>, ApiError> {
    let result = run_scoring(&state, req.transcript, req.weights).await?;
    Ok(Json(result))
}

/// POST /score-file. The `file` part must be UTF-8 text.
pub async fn score_file(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ScoringResult>, ApiError> {
    let mut transcript = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping multipart field");
            continue;
        }
        let filename = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::bad_request("Uploaded file is not valid UTF-8 text"))?;
        info!(filename = ?filename, bytes = text.len(), "Received transcript upload");
        transcript = Some(text);
        break;
    }

    let transcript = transcript
        .ok_or_else(|| ApiError::bad_request(format!("Missing multipart field '{FILE_FIELD}'")))?;

    let result = run_scoring(&state, transcript, None).await?;
    Ok(Json(result))
}

/// Scoring embeds the transcript, which can block on model inference, so it
/// runs off the async workers.
async fn run_scoring(
    state: &SharedState,
    transcript: String,
    weights: Option<ComponentWeights>,
) -> Result<ScoringResult, ApiError> {
    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || match weights {
        Some(w) => engine.score_with(&transcript, w),
        None => engine.score(&transcript),
    })
    .await??;

    debug!(overall = result.overall_score, words = result.words, "Scored transcript");
    Ok(result)
}
