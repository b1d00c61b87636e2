//! Text normalization for keyword matching

use crate::processing::stop_words::StopWords;
use regex::Regex;

/// Tokens at or below this length are dropped.
const MIN_TOKEN_LEN: usize = 2;

pub struct TextProcessor {
    stop_words: StopWords,
    non_letter_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(StopWords::english())
    }
}

impl TextProcessor {
    pub fn new(stop_words: StopWords) -> Self {
        let non_letter_regex = Regex::new(r"[^a-z\s]").expect("Invalid letter filter regex");

        Self {
            stop_words,
            non_letter_regex,
        }
    }

    /// Lowercase, keep ASCII letters only, drop stop words and short tokens,
    /// and join the survivors with single spaces.
    pub fn preprocess(&self, text: &str) -> String {
        self.tokenize(text).join(" ")
    }

    /// Same as [`preprocess`](Self::preprocess), treating a missing text as empty.
    pub fn preprocess_opt(&self, text: Option<&str>) -> String {
        text.map(|t| self.preprocess(t)).unwrap_or_default()
    }

    /// Ordered token set of a document.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        let lowered = text.to_lowercase();
        let letters_only = self.non_letter_regex.replace_all(&lowered, "");

        letters_only
            .split_whitespace()
            .filter(|token| token.len() > MIN_TOKEN_LEN && !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }
}
