//! Word tokenization.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Runs of letters, numbers and `_`.
///
/// Narrower than the regex crate's `\w`: combining marks and connector
/// punctuation other than `_` split words, so a decomposed `"cafe\u{301}s"`
/// is two tokens and word counts agree with stored historical scores.
fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\p{L}\p{N}_]+").expect("static regex"))
}

/// Lower-case `text` and split it into word tokens.
pub fn tokenize_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_regex().find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}

/// A transcript prepared once per scoring call.
#[derive(Debug, Clone)]
pub struct Transcript {
    lowered: String,
    tokens: HashSet<String>,
    word_count: usize,
}

impl Transcript {
    pub fn new(text: &str) -> Self {
        let tokens = tokenize_words(text);
        Self {
            lowered: text.to_lowercase(),
            word_count: tokens.len(),
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Exact token match or substring of the lower-cased text.
    ///
    /// The substring arm is what lets multi-word keywords such as
    /// `"return window"` match; both arms are needed.
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.tokens.contains(keyword) || self.lowered.contains(keyword)
    }
}
