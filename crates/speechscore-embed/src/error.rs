//! Failures of the sentence embedding backend.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Sentence model could not be built: {0}")]
    ModelLoad(String),

    #[error("Tokenization failed: {0}")]
    Tokenizer(String),

    #[error("Forward pass failed: {0}")]
    Inference(String),

    #[error("Fetching model files from the hub failed: {0}")]
    Download(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed model config: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<candle_core::Error> for EmbedError {
    fn from(err: candle_core::Error) -> Self {
        Self::Inference(err.to_string())
    }
}

impl From<tokenizers::Error> for EmbedError {
    fn from(err: tokenizers::Error) -> Self {
        Self::Tokenizer(err.to_string())
    }
}

impl From<hf_hub::api::sync::ApiError> for EmbedError {
    fn from(err: hf_hub::api::sync::ApiError) -> Self {
        Self::Download(err.to_string())
    }
}
