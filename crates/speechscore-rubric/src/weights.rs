//! Component weights for combining the three per-criterion signals.

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Weights for keyword coverage (`kw`), word-count conformance (`wc`) and
/// semantic similarity (`sem`).
///
/// The defaults sum to 1.0. Caller-supplied weights are used as given: a set
/// summing to 1.2 scales every criterion score by 1.2. Historical scores
/// depend on this, so there is no `normalise`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    #[serde(default = "default_kw")]
    pub kw: f64,
    #[serde(default = "default_wc")]
    pub wc: f64,
    #[serde(default = "default_sem")]
    pub sem: f64,
}

fn default_kw() -> f64 { 0.4 }
fn default_wc() -> f64 { 0.1 }
fn default_sem() -> f64 { 0.5 }

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            kw:  default_kw(),
            wc:  default_wc(),
            sem: default_sem(),
        }
    }
}

impl ComponentWeights {
    pub fn new(kw: f64, wc: f64, sem: f64) -> Self {
        Self { kw, wc, sem }
    }

    pub fn sum(&self) -> f64 {
        self.kw + self.wc + self.sem
    }

    /// Each weight finite and non-negative, total positive.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, w) in [("kw", self.kw), ("wc", self.wc), ("sem", self.sem)] {
            if !w.is_finite() || w < 0.0 {
                return Err(ScoringError::InvalidWeights(format!("{name} = {w}")));
            }
        }
        if self.sum() <= 0.0 {
            return Err(ScoringError::InvalidWeights("weights sum to zero".to_string()));
        }
        Ok(())
    }

    /// Weighted sum of the three signals, in the same units as the signals.
    pub fn combine(&self, kw: f64, wc: f64, sem: f64) -> f64 {
        kw * self.kw + wc * self.wc + sem * self.sem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let w = ComponentWeights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_combine_passes_through_unnormalised() {
        let w = ComponentWeights::new(1.0, 1.0, 1.0);
        assert!(w.validate().is_ok());
        assert!((w.combine(1.0, 1.0, 1.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_degenerate_weights() {
        assert!(ComponentWeights::new(0.0, 0.0, 0.0).validate().is_err());
        assert!(ComponentWeights::new(-0.1, 0.6, 0.5).validate().is_err());
        assert!(ComponentWeights::new(f64::NAN, 0.5, 0.5).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let w: ComponentWeights = serde_json::from_str(r#"{"sem": 0.9}"#).unwrap();
        assert_eq!(w, ComponentWeights::new(0.4, 0.1, 0.9));
    }
}
