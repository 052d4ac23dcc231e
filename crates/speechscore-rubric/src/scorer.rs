//! Transcript scoring against a loaded rubric.
//!
//! For each criterion:
//!   raw   = kw·W.kw + wc·W.wc + sem·W.sem
//!   score = raw × 100
//!   contribution = raw × (weight / total_weight) × 100
//!
//! overall = clamp(Σ contribution, 0, 100)

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use speechscore_embed::Embedder;
use tracing::{debug, instrument};

use crate::criterion::RubricTable;
use crate::error::ScoringError;
use crate::feedback::build_feedback;
use crate::signals::{keyword_score, semantic_score, wordcount_score};
use crate::tokenize::Transcript;
use crate::weights::ComponentWeights;

/// Per-criterion breakdown, serialized verbatim by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion_id: String,
    pub criterion_name: String,
    /// 0–100 with the default weights, 2 decimals.
    pub score: f64,
    pub weight: f64,
    pub keywords_found: Vec<String>,
    /// 3 decimals.
    pub keyword_score: f64,
    /// 3 decimals.
    pub word_count_score: f64,
    /// 3 decimals.
    pub semantic_score: f64,
    pub words: usize,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// In `[0, 100]`, 2 decimals.
    pub overall_score: f64,
    pub words: usize,
    pub criteria: Vec<CriterionResult>,
}

/// Score `transcript` against every criterion of `rubric`.
///
/// `weights` defaults to [`ComponentWeights::default`]. The transcript is
/// embedded once with `embedder`, which must be the backend that produced
/// the rubric's description embeddings.
#[instrument(skip_all, fields(criteria = rubric.len(), chars = transcript.len()))]
pub fn score_transcript(
    transcript: &str,
    rubric: &RubricTable,
    embedder: &dyn Embedder,
    weights: Option<ComponentWeights>,
) -> Result<ScoringResult, ScoringError> {
    let weights = weights.unwrap_or_default();
    weights.validate()?;

    let total_weight = rubric.total_weight();
    if rubric.is_empty() || total_weight <= 0.0 {
        return Err(ScoringError::EmptyRubric);
    }

    let start = Instant::now();
    let prepared = Transcript::new(transcript);
    let words = prepared.word_count();
    let transcript_embedding = embedder.embed(transcript)?;

    let mut overall = 0.0f64;
    let mut criteria = Vec::with_capacity(rubric.len());

    for criterion in rubric {
        let keywords = keyword_score(&prepared, &criterion.keywords);
        let wc = wordcount_score(words, criterion.min_words, criterion.max_words);
        let sem = semantic_score(&transcript_embedding, &criterion.description_embedding);

        let raw = weights.combine(keywords.score, wc, sem);
        overall += raw * (criterion.weight / total_weight) * 100.0;

        criteria.push(CriterionResult {
            criterion_id: criterion.criterion_id.clone(),
            criterion_name: criterion.criterion_name.clone(),
            score: round_to(raw * 100.0, 2),
            weight: criterion.weight,
            feedback: build_feedback(sem, keywords.score, wc, words, criterion.min_words, criterion.max_words),
            keywords_found: keywords.found,
            keyword_score: round_to(keywords.score, 3),
            word_count_score: round_to(wc, 3),
            semantic_score: round_to(sem, 3),
            words,
        });
    }

    let overall_score = round_to(overall.clamp(0.0, 100.0), 2);
    debug!(
        overall_score,
        words,
        "Scored transcript in {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ScoringResult {
        overall_score,
        words,
        criteria,
    })
}

/// Round to `decimals` places, ties to even (`0.0625` -> `0.062`), so
/// presented scores match the values historical clients already stored.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// ── Engine handle ────────────────────────────────────────────────────────────

/// A loaded rubric paired with the embedding backend that embedded it.
///
/// Cheap to clone; clones share the rubric and the backend.
#[derive(Clone)]
pub struct ScoringEngine {
    rubric: Arc<RubricTable>,
    embedder: Arc<dyn Embedder>,
    weights: ComponentWeights,
}

impl ScoringEngine {
    pub fn new(rubric: Arc<RubricTable>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            rubric,
            embedder,
            weights: ComponentWeights::default(),
        }
    }

    /// Replace the default component weights used by [`ScoringEngine::score`].
    pub fn with_weights(mut self, weights: ComponentWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn rubric(&self) -> &RubricTable {
        &self.rubric
    }

    pub fn weights(&self) -> ComponentWeights {
        self.weights
    }

    /// Score with the engine's configured weights.
    pub fn score(&self, transcript: &str) -> Result<ScoringResult, ScoringError> {
        self.score_with(transcript, self.weights)
    }

    /// Score with explicit weights for this call only.
    pub fn score_with(&self, transcript: &str, weights: ComponentWeights) -> Result<ScoringResult, ScoringError> {
        score_transcript(transcript, &self.rubric, self.embedder.as_ref(), Some(weights))
    }
}
