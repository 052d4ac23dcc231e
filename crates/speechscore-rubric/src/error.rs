use speechscore_embed::EmbedError;
use thiserror::Error;

/// The rubric source could not be turned into a table.
#[derive(Debug, Error)]
pub enum RubricLoadError {
    #[error("Failed to read rubric source: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rubric source is not valid tabular data: {0}")]
    Parse(#[from] csv::Error),

    #[error("Rubric workbook could not be read: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Rubric workbook has no worksheets")]
    NoWorksheet,

    #[error("Rubric header has none of the criterion columns (found: {found:?})")]
    NoCriteriaColumns { found: Vec<String> },

    #[error("Failed to embed criterion descriptions: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Embedding backend returned {got} vectors for {expected} descriptions")]
    EmbeddingCount { expected: usize, got: usize },
}

/// A scoring call could not produce a result.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Rubric has no criteria or a total weight of zero")]
    EmptyRubric,

    #[error("Invalid component weights: {0}")]
    InvalidWeights(String),

    #[error("Failed to embed transcript: {0}")]
    Embedding(#[from] EmbedError),
}
