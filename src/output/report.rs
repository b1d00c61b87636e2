//! Score report wrapping an ATS result with its provenance

use crate::processing::ats_matcher::AtsScore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: AtsScore,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the resume text came from (file path, "request", ...)
    pub resume_source: String,
    pub job_source: String,
    pub generated_at: DateTime<Utc>,
    pub tool_version: String,
}

/// Coarse band of an overall score, matching the recommendation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchVerdict {
    Good,
    Moderate,
    Low,
}

impl MatchVerdict {
    pub fn from_score(score: f64) -> Self {
        if score >= 60.0 {
            MatchVerdict::Good
        } else if score >= 30.0 {
            MatchVerdict::Moderate
        } else {
            MatchVerdict::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MatchVerdict::Good => "Good match",
            MatchVerdict::Moderate => "Moderate match",
            MatchVerdict::Low => "Low match",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MatchVerdict::Good => "🟢",
            MatchVerdict::Moderate => "🟡",
            MatchVerdict::Low => "🔴",
        }
    }
}

impl ScoreReport {
    pub fn new(score: AtsScore, resume_source: impl Into<String>, job_source: impl Into<String>) -> Self {
        Self {
            score,
            metadata: ReportMetadata {
                resume_source: resume_source.into(),
                job_source: job_source.into(),
                generated_at: Utc::now(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn verdict(&self) -> MatchVerdict {
        MatchVerdict::from_score(self.score.overall_score)
    }
}
