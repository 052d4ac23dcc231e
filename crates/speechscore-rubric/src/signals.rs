//! The three per-criterion signals, each in `[0, 1]`.

use speechscore_embed::cosine_similarity;

use crate::tokenize::Transcript;

/// Keyword coverage for one criterion.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub score: f64,
    /// Matched keywords in rubric order.
    pub found: Vec<String>,
}

/// Fraction of `keywords` present in the transcript; `0.0` when the
/// criterion declares none.
pub fn keyword_score(transcript: &Transcript, keywords: &[String]) -> KeywordMatch {
    if keywords.is_empty() {
        return KeywordMatch { score: 0.0, found: Vec::new() };
    }
    let found: Vec<String> = keywords
        .iter()
        .filter(|k| transcript.contains_keyword(k))
        .cloned()
        .collect();
    KeywordMatch {
        score: found.len() as f64 / keywords.len() as f64,
        found,
    }
}

/// Piecewise-linear length tolerance.
///
/// Inside `[min_words, max_words]` the score is 1. Below, it falls linearly to
/// 0 at zero words (no penalty when `min_words == 0`). Above, it falls
/// linearly to 0 at `2 * max_words`, and a zero `max_words` tolerates nothing.
pub fn wordcount_score(words: usize, min_words: u32, max_words: u32) -> f64 {
    let n = words as f64;
    let (min, max) = (min_words as f64, max_words as f64);

    if min <= n && n <= max {
        return 1.0;
    }
    if n < min {
        if min_words == 0 {
            return 1.0;
        }
        return (1.0 - (min - n) / min).max(0.0);
    }
    if max_words == 0 {
        return 0.0;
    }
    (1.0 - (n - max) / max).max(0.0)
}

/// Cosine similarity remapped from `[-1, 1]` to `[0, 1]`.
pub fn semantic_score(transcript_embedding: &[f32], description_embedding: &[f32]) -> f64 {
    let sim = cosine_similarity(transcript_embedding, description_embedding) as f64;
    ((sim + 1.0) / 2.0).clamp(0.0, 1.0)
}
