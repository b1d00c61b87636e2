//! Configuration management for the resume matcher

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub stop_words: StopWordConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Share of the overall score taken by TF-IDF cosine similarity
    pub similarity_weight: f64,
    /// Share of the overall score taken by keyword coverage
    pub keyword_weight: f64,
    pub top_job_keywords: usize,
    pub top_resume_keywords: usize,
    /// How many of the job's top keywords are checked against the resume
    pub keywords_to_match: usize,
    /// Cap on matched/missing keyword lists in the result
    pub max_listed_keywords: usize,
    /// Cap on the job/resume keyword lists in the result
    pub max_display_keywords: usize,
}

/// Adjustments to the built-in preprocessing stop-word list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopWordConfig {
    #[serde(default)]
    pub additional: Vec<String>,
    #[serde(default)]
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_weight: 0.6,
            keyword_weight: 0.4,
            top_job_keywords: 30,
            top_resume_keywords: 50,
            keywords_to_match: 20,
            max_listed_keywords: 10,
            max_display_keywords: 15,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            stop_words: StopWordConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            MatcherError::Configuration(format!("Failed to parse config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;

        for (name, weight) in [
            ("similarity_weight", scoring.similarity_weight),
            ("keyword_weight", scoring.keyword_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(MatcherError::Configuration(format!(
                    "scoring.{} must be between 0 and 1, got {}",
                    name, weight
                )));
            }
        }

        let total = scoring.similarity_weight + scoring.keyword_weight;
        if (total - 1.0).abs() > 1e-6 {
            return Err(MatcherError::Configuration(format!(
                "scoring weights must sum to 1, got {:.3}",
                total
            )));
        }

        for (name, value) in [
            ("top_job_keywords", scoring.top_job_keywords),
            ("top_resume_keywords", scoring.top_resume_keywords),
            ("keywords_to_match", scoring.keywords_to_match),
        ] {
            if value == 0 {
                return Err(MatcherError::Configuration(format!(
                    "scoring.{} must be positive",
                    name
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.top_job_keywords, 30);
        assert_eq!(config.scoring.top_resume_keywords, 50);
        assert_eq!(config.scoring.keywords_to_match, 20);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.stop_words.additional.push("synergy".to_string());
        config.output.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_stop_words_section_is_optional() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut content = toml::to_string_pretty(&Config::default()).unwrap();
        content = content
            .lines()
            .filter(|l| !l.starts_with("[stop_words]") && !l.starts_with("additional") && !l.starts_with("excluded"))
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(&path, content).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.stop_words, StopWordConfig::default());
    }

    #[test]
    fn test_rejects_bad_weights() {
        let mut config = Config::default();
        config.scoring.similarity_weight = 0.9;
        assert!(matches!(config.validate(), Err(MatcherError::Configuration(_))));

        config.scoring.similarity_weight = -0.6;
        config.scoring.keyword_weight = 1.6;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_caps() {
        let mut config = Config::default();
        config.scoring.keywords_to_match = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scoring = [not valid").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(MatcherError::Configuration(_))
        ));
    }
}
