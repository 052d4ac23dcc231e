//! Templated per-criterion feedback.
//!
//! The wording, spelling and spacing are kept byte-for-byte with the
//! messages earlier releases emitted; clients match on these strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticTier {
    Good,
    Partial,
    Low,
}

impl SemanticTier {
    pub fn from_score(sem: f64) -> Self {
        if sem >= 0.7 {
            SemanticTier::Good
        } else if sem >= 0.4 {
            SemanticTier::Partial
        } else {
            SemanticTier::Low
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SemanticTier::Good => "Good semantic match.",
            SemanticTier::Partial => "Partial semantic match,could be clearer.",
            SemanticTier::Low => "Low semantic match to rubric.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordTier {
    Most,
    Some,
    None,
}

impl KeywordTier {
    pub fn from_score(kw: f64) -> Self {
        if kw >= 0.75 {
            KeywordTier::Most
        } else if kw > 0.0 {
            KeywordTier::Some
        } else {
            KeywordTier::None
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            KeywordTier::Most => "Most keywords present.",
            KeywordTier::Some => "Some keywords presents.",
            KeywordTier::None => "No rubric keyword found; consider adding them.",
        }
    }
}

/// Word-count score below which the length caveat is added.
pub const WORD_COUNT_CAVEAT_BELOW: f64 = 0.5;

/// Semantic tier, keyword tier, then the optional length caveat, joined by
/// single spaces.
pub fn build_feedback(sem: f64, kw: f64, wc: f64, words: usize, min_words: u32, max_words: u32) -> String {
    let mut parts = vec![
        SemanticTier::from_score(sem).message().to_string(),
        KeywordTier::from_score(kw).message().to_string(),
    ];
    if wc < WORD_COUNT_CAVEAT_BELOW {
        parts.push(format!(
            "Word count {words} Outside suggested range [{min_words},{max_words}]."
        ));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(SemanticTier::from_score(0.7), SemanticTier::Good);
        assert_eq!(SemanticTier::from_score(0.69), SemanticTier::Partial);
        assert_eq!(SemanticTier::from_score(0.4), SemanticTier::Partial);
        assert_eq!(SemanticTier::from_score(0.39), SemanticTier::Low);

        assert_eq!(KeywordTier::from_score(0.75), KeywordTier::Most);
        assert_eq!(KeywordTier::from_score(0.5), KeywordTier::Some);
        assert_eq!(KeywordTier::from_score(0.0), KeywordTier::None);
    }

    #[test]
    fn test_feedback_without_caveat() {
        assert_eq!(
            build_feedback(0.8, 1.0, 1.0, 9, 5, 50),
            "Good semantic match. Most keywords present."
        );
    }

    #[test]
    fn test_feedback_with_caveat() {
        assert_eq!(
            build_feedback(0.3, 0.0, 0.0, 0, 10, 100),
            "Low semantic match to rubric. No rubric keyword found; consider adding them. \
             Word count 0 Outside suggested range [10,100]."
        );
    }

    #[test]
    fn test_messages_match_stored_wording() {
        assert_eq!(SemanticTier::Partial.message(), "Partial semantic match,could be clearer.");
        assert_eq!(KeywordTier::Some.message(), "Some keywords presents.");
        assert_eq!(KeywordTier::None.message(), "No rubric keyword found; consider adding them.");
        assert_eq!(
            build_feedback(0.5, 0.5, 0.0, 120, 5, 50),
            "Partial semantic match,could be clearer. Some keywords presents. \
             Word count 120 Outside suggested range [5,50]."
        );
    }

    #[test]
    fn test_caveat_threshold_is_strict() {
        assert!(!build_feedback(0.5, 0.5, 0.5, 5, 10, 100).contains("Word count"));
        assert!(build_feedback(0.5, 0.5, 0.49, 5, 10, 100).contains("Word count"));
    }
}
