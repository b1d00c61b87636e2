//! TF-IDF term weighting over small document sets
//!
//! Tokens are runs of two or more word characters. Stop words are removed
//! before n-grams are built, IDF is smoothed as `ln((1 + n) / (1 + df)) + 1`,
//! and every document row is L2-normalized. Vocabulary order is alphabetical.

use crate::processing::stop_words::StopWords;
use ndarray::{Array1, Array2, ArrayView1};
use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VectorizeError {
    #[error("empty vocabulary; the documents may only contain stop words")]
    EmptyVocabulary,

    #[error("max_features must be positive")]
    InvalidMaxFeatures,

    #[error("invalid n-gram range ({0}, {1})")]
    InvalidNgramRange(usize, usize),
}

pub struct TfidfVectorizer {
    stop_words: StopWords,
    ngram_range: (usize, usize),
    token_regex: Regex,
}

/// Weighted document-term matrix produced by a single fit.
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    vocabulary: Vec<String>,
    rows: Array2<f64>,
}

impl TfidfVectorizer {
    /// Unigram and bigram vectorizer with the given stop words.
    pub fn new(stop_words: StopWords) -> Self {
        let token_regex = Regex::new(r"\b\w\w+\b").expect("Invalid token regex");

        Self {
            stop_words,
            ngram_range: (1, 2),
            token_regex,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    /// Split a document into its n-gram terms, in document order.
    pub fn analyze(&self, doc: &str) -> Vec<String> {
        let lowered = doc.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Fit a fresh model over `docs` and return the weighted matrix.
    ///
    /// With `max_features`, only the terms most frequent across the whole
    /// corpus are kept; equal counts are broken alphabetically.
    pub fn fit_transform(
        &self,
        docs: &[&str],
        max_features: Option<usize>,
    ) -> Result<TfidfMatrix, VectorizeError> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(VectorizeError::InvalidNgramRange(min_n, max_n));
        }
        if max_features == Some(0) {
            return Err(VectorizeError::InvalidMaxFeatures);
        }

        let doc_counts: Vec<BTreeMap<String, usize>> = docs
            .iter()
            .map(|doc| {
                let mut counts = BTreeMap::new();
                for term in self.analyze(doc) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut corpus_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                *corpus_counts.entry(term.as_str()).or_insert(0) += count;
            }
        }

        if corpus_counts.is_empty() {
            return Err(VectorizeError::EmptyVocabulary);
        }

        let vocabulary: Vec<String> = match max_features {
            Some(limit) if limit < corpus_counts.len() => {
                // BTreeMap iteration is alphabetical and the sort is stable.
                let mut ranked: Vec<(&str, usize)> = corpus_counts.into_iter().collect();
                ranked.sort_by(|a, b| b.1.cmp(&a.1));
                let mut kept: Vec<String> = ranked
                    .into_iter()
                    .take(limit)
                    .map(|(term, _)| term.to_string())
                    .collect();
                kept.sort();
                kept
            }
            _ => corpus_counts.into_keys().map(str::to_string).collect(),
        };

        let n_docs = docs.len() as f64;
        let idf: Array1<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_counts.iter().filter(|c| c.contains_key(term)).count() as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let mut rows = Array2::<f64>::zeros((docs.len(), vocabulary.len()));
        for (i, counts) in doc_counts.iter().enumerate() {
            for (j, term) in vocabulary.iter().enumerate() {
                if let Some(&count) = counts.get(term) {
                    rows[[i, j]] = count as f64 * idf[j];
                }
            }

            let mut row = rows.row_mut(i);
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }

        Ok(TfidfMatrix { vocabulary, rows })
    }
}

impl TfidfMatrix {
    #[cfg(test)]
    pub(crate) fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn row(&self, doc: usize) -> ArrayView1<'_, f64> {
        self.rows.row(doc)
    }

    /// Terms of one document sorted by weight, highest first.
    ///
    /// Equal weights keep alphabetical order. Zero weights are dropped.
    pub fn ranked_terms(&self, doc: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .vocabulary
            .iter()
            .zip(self.rows.row(doc).iter())
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(term, weight)| (term.clone(), *weight))
            .collect();

        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }
}

/// Cosine of the angle between two term vectors, in [0, 1] for
/// non-negative weights. Zero vectors have similarity 0.
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (a.dot(&b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}
