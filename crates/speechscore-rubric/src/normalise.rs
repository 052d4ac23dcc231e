//! Cell-level normalisation for rubric rows.
//!
//! Every function here is total: a malformed cell degrades to the column
//! default instead of failing the load.

use crate::criterion::{DEFAULT_MAX_WORDS, DEFAULT_MIN_WORDS, DEFAULT_WEIGHT};

/// Split a raw keyword cell on `,` or `;`, lower-case and trim each token,
/// drop empties. Order and duplicates are preserved.
pub fn parse_keywords(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .to_lowercase()
        .split([',', ';'])
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a word-count bound.
///
/// Accepts integers and integral-looking floats (`"12"`, `"12.0"`; fractions
/// truncate). Blank, non-numeric, negative or out-of-range cells yield
/// `None` so the caller can substitute its default.
pub fn parse_word_bound(raw: Option<&str>) -> Option<u32> {
    let cell = raw?.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(n) = cell.parse::<u32>() {
        return Some(n);
    }
    let f = cell.parse::<f64>().ok()?;
    (f.is_finite() && f >= 0.0 && f <= u32::MAX as f64).then(|| f.trunc() as u32)
}

pub fn parse_min_words(raw: Option<&str>) -> u32 {
    parse_word_bound(raw).unwrap_or(DEFAULT_MIN_WORDS)
}

pub fn parse_max_words(raw: Option<&str>) -> u32 {
    parse_word_bound(raw).unwrap_or(DEFAULT_MAX_WORDS)
}

/// Parse a criterion weight; anything that is not a finite, non-negative
/// number becomes `1.0`.
pub fn parse_weight(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|cell| cell.parse::<f64>().ok())
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Trimmed cell, or `None` when blank.
pub fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
