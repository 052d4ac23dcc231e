//! speechscore-rubric: rubric loading and transcript scoring engine.
//!
//! [`load_rubric`] builds an immutable [`RubricTable`] once at startup;
//! [`score_transcript`] (or a [`ScoringEngine`] handle) scores any number of
//! transcripts against it, concurrently if needed.

pub mod criterion;
pub mod error;
pub mod feedback;
pub mod loader;
pub mod normalise;
pub mod scorer;
pub mod signals;
pub mod tokenize;
pub mod weights;

pub use criterion::{RubricCriterion, RubricTable};
pub use error::{RubricLoadError, ScoringError};
pub use loader::{load_rubric, load_rubric_from_reader, load_rubric_from_workbook};
pub use scorer::{score_transcript, CriterionResult, ScoringEngine, ScoringResult};
pub use weights::ComponentWeights;
