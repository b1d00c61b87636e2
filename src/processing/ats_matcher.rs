//! ATS (Applicant Tracking System) scoring of a resume against a job description
//!
//! The score blends TF-IDF cosine similarity of the two documents with the
//! share of the job's top keywords that also appear among the resume's
//! keywords. Every call fits its own models; nothing is cached between calls.

use crate::config::{Config, ScoringConfig};
use crate::processing::stop_words::StopWords;
use crate::processing::text_processor::TextProcessor;
use crate::processing::tfidf::{cosine_similarity, TfidfVectorizer, VectorizeError};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const INVALID_INPUT_MESSAGE: &str = "Please provide valid resume and job description text.";
pub const FALLBACK_MESSAGE: &str = "Please check your input text and try again.";

const LOW_MATCH_THRESHOLD: f64 = 30.0;
const GOOD_MATCH_THRESHOLD: f64 = 60.0;
const TIPS_THRESHOLD: f64 = 70.0;

const MISSING_TERMS_SHOWN: usize = 5;
const MATCHED_SKILLS_SHOWN: usize = 3;

const GENERAL_TIPS: [&str; 4] = [
    "Use exact keywords from the job description",
    "Quantify your achievements with numbers",
    "Tailor your resume for this specific role",
    "Include relevant certifications and skills",
];

/// Everything a matcher needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct MatcherConfig {
    /// Removed while preprocessing raw text
    pub stop_words: StopWords,
    /// Removed by the TF-IDF vectorizer before n-grams are built
    pub vectorizer_stop_words: StopWords,
    pub scoring: ScoringConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stop_words: StopWords::english(),
            vectorizer_stop_words: StopWords::vectorizer_english(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl MatcherConfig {
    pub fn from_config(config: &Config) -> Self {
        let stop_words = StopWords::english()
            .with_additional(&config.stop_words.additional)
            .without(&config.stop_words.excluded);

        Self {
            stop_words,
            vectorizer_stop_words: StopWords::vectorizer_english(),
            scoring: config.scoring.clone(),
        }
    }
}

/// A keyword and its TF-IDF weight within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
}

/// Match result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub overall_score: f64,
    pub similarity_score: f64,
    pub keyword_match: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub job_keywords: Vec<String>,
    #[serde(default)]
    pub resume_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AtsScore {
    fn zero(recommendation: &str, error: Option<String>) -> Self {
        Self {
            overall_score: 0.0,
            similarity_score: 0.0,
            keyword_match: 0.0,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            recommendations: vec![recommendation.to_string()],
            job_keywords: Vec::new(),
            resume_keywords: Vec::new(),
            error,
        }
    }

    /// Result for a resume or job description with no usable words.
    pub fn invalid_input() -> Self {
        Self::zero(INVALID_INPUT_MESSAGE, None)
    }

    /// Result for a call whose vectorization failed.
    pub fn vectorization_failed(err: &VectorizeError) -> Self {
        Self::zero(
            FALLBACK_MESSAGE,
            Some(format!("Error calculating ATS score: {}", err)),
        )
    }
}

/// Outcome of a scoring call, with the degenerate paths made explicit.
#[derive(Debug, Clone, PartialEq)]
pub enum AtsOutcome {
    Scored(AtsScore),
    /// One or both documents normalized to nothing.
    InvalidInput { resume_empty: bool, job_empty: bool },
    VectorizationFailed(VectorizeError),
}

impl AtsOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self, AtsOutcome::Scored(_))
    }

    /// Collapse any outcome into the response payload.
    pub fn into_score(self) -> AtsScore {
        match self {
            AtsOutcome::Scored(score) => score,
            AtsOutcome::InvalidInput { .. } => AtsScore::invalid_input(),
            AtsOutcome::VectorizationFailed(err) => AtsScore::vectorization_failed(&err),
        }
    }
}

/// Resume/job matcher. Immutable once built, so one instance can serve
/// concurrent callers.
pub struct AtsMatcher {
    processor: TextProcessor,
    vectorizer: TfidfVectorizer,
    scoring: ScoringConfig,
}

impl Default for AtsMatcher {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl AtsMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self {
            processor: TextProcessor::new(config.stop_words),
            vectorizer: TfidfVectorizer::new(config.vectorizer_stop_words),
            scoring: config.scoring,
        }
    }

    pub fn preprocess(&self, text: &str) -> String {
        self.processor.preprocess(text)
    }

    /// Top keywords of a single document, highest weight first.
    ///
    /// The document is its own corpus, so weights are proportional to term
    /// frequency among the `top_n` most frequent terms.
    pub fn extract_keywords(&self, text: &str, top_n: usize) -> Vec<Keyword> {
        let processed = self.processor.preprocess(text);
        if processed.is_empty() {
            return Vec::new();
        }

        match self.vectorizer.fit_transform(&[processed.as_str()], Some(top_n)) {
            Ok(matrix) => matrix
                .ranked_terms(0)
                .into_iter()
                .map(|(term, weight)| Keyword { term, weight })
                .collect(),
            Err(e) => {
                warn!("Keyword extraction error: {}", e);
                Vec::new()
            }
        }
    }

    pub fn calculate_ats_score(&self, resume_text: &str, job_description: &str) -> AtsOutcome {
        let resume_clean = self.processor.preprocess(resume_text);
        let job_clean = self.processor.preprocess(job_description);

        if resume_clean.is_empty() || job_clean.is_empty() {
            debug!(
                "Empty input after preprocessing (resume empty: {}, job empty: {})",
                resume_clean.is_empty(),
                job_clean.is_empty()
            );
            return AtsOutcome::InvalidInput {
                resume_empty: resume_clean.is_empty(),
                job_empty: job_clean.is_empty(),
            };
        }

        let matrix = match self.vectorizer.fit_transform(&[resume_clean.as_str(), job_clean.as_str()], None) {
            Ok(matrix) => matrix,
            Err(e) => {
                error!("Error calculating ATS score: {}", e);
                return AtsOutcome::VectorizationFailed(e);
            }
        };
        let similarity = cosine_similarity(matrix.row(0), matrix.row(1));

        let scoring = &self.scoring;
        let job_keywords = self.extract_keywords(job_description, scoring.top_job_keywords);
        let resume_keywords = self.extract_keywords(resume_text, scoring.top_resume_keywords);

        let resume_set: HashSet<&str> = resume_keywords.iter().map(|k| k.term.as_str()).collect();
        let job_set: Vec<&str> = job_keywords
            .iter()
            .take(scoring.keywords_to_match)
            .map(|k| k.term.as_str())
            .collect();

        // Both lists keep the job keywords' weight order.
        let (matched, missing): (Vec<&str>, Vec<&str>) =
            job_set.iter().partition(|term| resume_set.contains(*term));

        let keyword_match = if job_set.is_empty() {
            0.0
        } else {
            matched.len() as f64 / job_set.len() as f64 * 100.0
        };

        let overall = ((similarity * scoring.similarity_weight
            + keyword_match / 100.0 * scoring.keyword_weight)
            * 100.0)
            .clamp(0.0, 100.0);

        let matched: Vec<String> = matched.into_iter().map(str::to_string).collect();
        let missing: Vec<String> = missing.into_iter().map(str::to_string).collect();
        let recommendations = generate_recommendations(overall, &missing, &matched);

        debug!(
            "ATS score {:.2} (similarity {:.4}, keyword match {:.2}, {} matched, {} missing)",
            overall,
            similarity,
            keyword_match,
            matched.len(),
            missing.len()
        );

        AtsOutcome::Scored(AtsScore {
            overall_score: round2(overall),
            similarity_score: round2(similarity * 100.0),
            keyword_match: round2(keyword_match),
            matched_keywords: truncated(matched, scoring.max_listed_keywords),
            missing_keywords: truncated(missing, scoring.max_listed_keywords),
            recommendations,
            job_keywords: display_terms(&job_keywords, scoring.max_display_keywords),
            resume_keywords: display_terms(&resume_keywords, scoring.max_display_keywords),
            error: None,
        })
    }
}

/// Recommendation lines for a score, in a fixed order.
pub fn generate_recommendations(score: f64, missing: &[String], matched: &[String]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if score < LOW_MATCH_THRESHOLD {
        recommendations.push("Low match score. Consider significant resume improvements.".to_string());
    } else if score < GOOD_MATCH_THRESHOLD {
        recommendations.push("Moderate match. Some improvements needed.".to_string());
    } else {
        recommendations.push("Good match! Your resume aligns well with the job.".to_string());
    }

    if !missing.is_empty() {
        let shown: Vec<&str> = missing.iter().take(MISSING_TERMS_SHOWN).map(String::as_str).collect();
        recommendations.push(format!("Add these key terms: {}", shown.join(", ")));
    }

    if !matched.is_empty() {
        let shown: Vec<&str> = matched.iter().take(MATCHED_SKILLS_SHOWN).map(String::as_str).collect();
        recommendations.push(format!("Great! You have these relevant skills: {}", shown.join(", ")));
    }

    if score < TIPS_THRESHOLD {
        recommendations.extend(GENERAL_TIPS.iter().map(|tip| tip.to_string()));
    }

    recommendations
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn truncated(mut items: Vec<String>, limit: usize) -> Vec<String> {
    items.truncate(limit);
    items
}

fn display_terms(keywords: &[Keyword], limit: usize) -> Vec<String> {
    keywords.iter().take(limit).map(|k| k.term.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Experienced Python developer skilled in Flask Django REST APIs SQL databases team player problem solving";
    const JOB: &str = "Looking for Python developer experience Flask REST APIs SQL databases team player problem solving Django plus";

    fn scored(outcome: AtsOutcome) -> AtsScore {
        match outcome {
            AtsOutcome::Scored(score) => score,
            other => panic!("expected a score, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_keywords_empty() {
        let matcher = AtsMatcher::default();
        assert!(matcher.extract_keywords("", 10).is_empty());
        assert!(matcher.extract_keywords("the and of it", 10).is_empty());
    }

    #[test]
    fn test_extract_keywords_order_and_cap() {
        let matcher = AtsMatcher::default();
        let keywords = matcher.extract_keywords("rust rust rust python python kubernetes", 3);

        let terms: Vec<&str> = keywords.iter().map(|k| k.term.as_str()).collect();
        assert_eq!(terms, vec!["rust", "python", "rust rust"]);
        assert!(keywords.windows(2).all(|w| w[0].weight >= w[1].weight));
        assert!(keywords.iter().all(|k| k.weight > 0.0));
    }

    #[test]
    fn test_extract_keywords_only_vectorizer_stop_words() {
        // "system" survives preprocessing but not vectorization
        let matcher = AtsMatcher::default();
        assert!(matcher.extract_keywords("system system", 5).is_empty());
    }

    #[test]
    fn test_invalid_input() {
        let matcher = AtsMatcher::default();

        for (resume, job) in [("", "anything goes here"), ("anything goes here", ""), ("", "")] {
            let outcome = matcher.calculate_ats_score(resume, job);
            assert!(matches!(outcome, AtsOutcome::InvalidInput { .. }));

            let score = outcome.into_score();
            assert_eq!(score.overall_score, 0.0);
            assert_eq!(score.keyword_match, 0.0);
            assert!(score.matched_keywords.is_empty());
            assert!(score.missing_keywords.is_empty());
            assert_eq!(score.recommendations.len(), 1);
            assert!(score.recommendations[0].contains("valid"));
            assert!(score.error.is_none());
        }
    }

    #[test]
    fn test_invalid_input_reports_side() {
        let matcher = AtsMatcher::default();
        assert_eq!(
            matcher.calculate_ats_score("of the", "python developer"),
            AtsOutcome::InvalidInput {
                resume_empty: true,
                job_empty: false
            }
        );
    }

    #[test]
    fn test_vectorization_failure_is_recovered() {
        let matcher = AtsMatcher::default();
        let outcome = matcher.calculate_ats_score("system fire bill", "interest system");

        assert_eq!(
            outcome,
            AtsOutcome::VectorizationFailed(VectorizeError::EmptyVocabulary)
        );
        let score = outcome.into_score();
        assert_eq!(score.overall_score, 0.0);
        assert!(score.error.as_deref().unwrap().contains("ATS score"));
        assert_eq!(score.recommendations, vec![FALLBACK_MESSAGE.to_string()]);
    }

    #[test]
    fn test_python_developer_scenario() {
        let matcher = AtsMatcher::default();
        let score = scored(matcher.calculate_ats_score(RESUME, JOB));

        // 12 of the job's 20 top keywords appear in the resume
        assert_eq!(score.keyword_match, 60.0);
        assert!((score.similarity_score - 55.95).abs() < 0.01, "similarity {}", score.similarity_score);
        assert!((score.overall_score - 57.57).abs() < 0.01, "overall {}", score.overall_score);
        assert_eq!(score.matched_keywords.len(), 10);
        assert!(score.matched_keywords.contains(&"flask".to_string()));
        assert!(score.matched_keywords.contains(&"django".to_string()));
        assert_eq!(score.missing_keywords.len(), 8);
        assert!(score.missing_keywords.contains(&"looking".to_string()));
        assert!(score.recommendations[0].starts_with("Moderate match"));
    }

    #[test]
    fn test_identical_documents() {
        let matcher = AtsMatcher::default();
        let score = scored(matcher.calculate_ats_score(RESUME, RESUME));

        assert!((score.similarity_score - 100.0).abs() < 0.01);
        assert!(score.missing_keywords.is_empty());
        assert_eq!(score.keyword_match, 100.0);
        assert_eq!(score.overall_score, 100.0);
    }

    #[test]
    fn test_unrelated_documents() {
        let matcher = AtsMatcher::default();
        let score = scored(matcher.calculate_ats_score(
            "Pastry chef baking croissants sourdough bread",
            "Kubernetes cluster administrator terraform networking",
        ));

        assert_eq!(score.similarity_score, 0.0);
        assert_eq!(score.keyword_match, 0.0);
        assert!(score.matched_keywords.is_empty());
        assert!(score.recommendations[0].starts_with("Low match"));
        assert!(score.recommendations[1].starts_with("Add these key terms: "));
    }

    #[test]
    fn test_scores_are_bounded_and_deterministic() {
        let matcher = AtsMatcher::default();
        let pairs = [
            (RESUME, JOB),
            ("rust tokio async services", "python data science pandas"),
            ("manager leadership budget", "manager leadership budget strategy hiring"),
        ];

        for (resume, job) in pairs {
            let first = scored(matcher.calculate_ats_score(resume, job));
            let second = scored(matcher.calculate_ats_score(resume, job));
            assert_eq!(first, second);

            for value in [first.overall_score, first.similarity_score, first.keyword_match] {
                assert!((0.0..=100.0).contains(&value));
            }
            assert!(first.job_keywords.len() <= 15);
            assert!(first.resume_keywords.len() <= 15);
        }
    }

    #[test]
    fn test_missing_keywords_follow_job_weight_order() {
        let matcher = AtsMatcher::default();
        let job = "kubernetes kubernetes kubernetes terraform terraform golang";
        let score = scored(matcher.calculate_ats_score("golang developer", job));

        assert_eq!(score.matched_keywords, vec!["golang"]);
        assert_eq!(
            score.missing_keywords,
            vec![
                "kubernetes",
                "kubernetes kubernetes",
                "terraform",
                "kubernetes terraform",
                "terraform golang",
                "terraform terraform",
            ]
        );
    }

    #[test]
    fn test_custom_stop_words_are_injected() {
        let config = MatcherConfig {
            stop_words: StopWords::english().with_additional(["python"]),
            ..MatcherConfig::default()
        };
        let matcher = AtsMatcher::new(config);
        assert_eq!(matcher.preprocess("python developer"), "developer");
    }

    #[test]
    fn test_recommendations_low_score_without_keywords() {
        let recs = generate_recommendations(20.0, &[], &[]);
        assert_eq!(recs.len(), 5);
        assert!(recs[0].starts_with("Low match"));
        assert_eq!(&recs[1..], &GENERAL_TIPS.map(String::from));
    }

    #[test]
    fn test_recommendations_table() {
        let missing: Vec<String> = ["a", "b", "c", "d", "e", "f"].iter().map(|s| s.to_string()).collect();
        let matched: Vec<String> = ["x", "y", "z", "w"].iter().map(|s| s.to_string()).collect();

        let recs = generate_recommendations(45.0, &missing, &matched);
        assert!(recs[0].starts_with("Moderate match"));
        assert_eq!(recs[1], "Add these key terms: a, b, c, d, e");
        assert_eq!(recs[2], "Great! You have these relevant skills: x, y, z");
        assert_eq!(recs.len(), 7);

        let recs = generate_recommendations(65.0, &[], &matched);
        assert!(recs[0].starts_with("Good match"));
        assert_eq!(recs.len(), 6);

        let recs = generate_recommendations(70.0, &[], &[]);
        assert_eq!(recs.len(), 1);

        assert!(generate_recommendations(30.0, &[], &[])[0].starts_with("Moderate"));
        assert!(generate_recommendations(60.0, &[], &[])[0].starts_with("Good"));
    }

    #[test]
    fn test_score_serialization_omits_missing_error() {
        let matcher = AtsMatcher::default();
        let score = scored(matcher.calculate_ats_score(RESUME, JOB));
        let json = serde_json::to_value(&score).unwrap();

        assert!(json.get("error").is_none());
        assert!(json["overall_score"].is_number());

        let failed = AtsScore::vectorization_failed(&VectorizeError::EmptyVocabulary);
        let json = serde_json::to_value(&failed).unwrap();
        assert!(json["error"].is_string());
    }
}
