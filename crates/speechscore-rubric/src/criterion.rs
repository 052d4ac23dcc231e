//! In-memory rubric model.

use serde::Serialize;

/// Default lower word bound when the rubric leaves it blank.
pub const DEFAULT_MIN_WORDS: u32 = 0;
/// Default upper word bound when the rubric leaves it blank.
pub const DEFAULT_MAX_WORDS: u32 = 9999;
/// Default criterion weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One scorable row of a rubric.
///
/// `min_words <= max_words` is not enforced; a pathological
/// rubric is scored as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricCriterion {
    pub criterion_id: String,
    pub criterion_name: String,
    pub description: String,
    /// Lower-cased, trimmed, non-empty; rubric order, duplicates kept.
    pub keywords: Vec<String>,
    pub min_words: u32,
    pub max_words: u32,
    /// Always finite and >= 0.
    pub weight: f64,
    #[serde(skip_serializing)]
    pub description_embedding: Vec<f32>,
}

/// Immutable, ordered rubric shared by all scoring calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RubricTable {
    criteria: Vec<RubricCriterion>,
    total_weight: f64,
}

impl RubricTable {
    pub fn new(criteria: Vec<RubricCriterion>) -> Self {
        let total_weight = criteria.iter().map(|c| c.weight).sum();
        Self { criteria, total_weight }
    }

    pub fn criteria(&self) -> &[RubricCriterion] {
        &self.criteria
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RubricCriterion> {
        self.criteria.iter()
    }

    /// Sum of all criterion weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl<'a> IntoIterator for &'a RubricTable {
    type Item = &'a RubricCriterion;
    type IntoIter = std::slice::Iter<'a, RubricCriterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.criteria.iter()
    }
}
