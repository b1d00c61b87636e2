//! JSON score requests: `{"resume_text": ..., "job_description": ...}`

use crate::error::{MatcherError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl ScoreRequest {
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(MatcherError::InvalidInput("Empty score request".to_string()));
        }
        Ok(serde_json::from_str(content)?)
    }

    /// Read a request from `path`, or from stdin when no path is given.
    pub async fn read(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => tokio::fs::read_to_string(path).await?,
            None => {
                let mut buffer = String::new();
                tokio::io::stdin().read_to_string(&mut buffer).await?;
                buffer
            }
        };
        Self::from_json(&content)
    }
}
