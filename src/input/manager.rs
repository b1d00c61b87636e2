//! Input manager for handling different file types

use crate::error::{MatcherError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                debug!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(MatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(MatcherError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    /// Extract a resume; with `require_pdf`, anything but a PDF is rejected
    /// before it is read.
    pub async fn extract_resume(&mut self, path: &Path, require_pdf: bool) -> Result<String> {
        if require_pdf && !FileType::from_path(path).is_pdf() {
            return Err(MatcherError::UnsupportedFormat(format!(
                "Resume must be a PDF: {}",
                path.display()
            )));
        }
        self.extract_text(path).await
    }

    /// Extract text from uploaded bytes with a declared content type.
    /// Only PDF uploads are accepted.
    pub fn extract_upload(&self, bytes: &[u8], content_type: &str, filename: &str) -> Result<String> {
        if !FileType::from_mime(content_type).is_pdf() {
            return Err(MatcherError::UnsupportedFormat(format!(
                "Only PDF uploads are supported, got '{}' for {}",
                content_type, filename
            )));
        }
        PdfExtractor.extract_from_bytes(bytes, filename)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                MatcherError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
