//! Text extraction from various file formats

use crate::error::{MatcherError, Result};
use pulldown_cmark::{Event, Parser, Tag};
use std::any::Any;
use std::panic;
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl PdfExtractor {
    /// Extract text from an in-memory PDF, e.g. an uploaded file.
    ///
    /// A panic inside `pdf_extract` (missing fonts, unusual encodings) is
    /// reported as `PdfExtraction` like any other extraction failure.
    pub fn extract_from_bytes(&self, bytes: &[u8], source: &str) -> Result<String> {
        match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(MatcherError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                source, e
            ))),
            Err(payload) => Err(MatcherError::PdfExtraction(format!(
                "Failed to extract text from PDF '{}': {}",
                source,
                panic_message(payload.as_ref())
            ))),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unreadable PDF"
    }
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        self.extract_from_bytes(&bytes, &path.display().to_string())
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(self.markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Plain text of a Markdown document, one block per line.
    pub fn markdown_to_text(&self, markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak => text.push(' '),
                Event::HardBreak | Event::Rule => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_))
                | Event::End(Tag::TableCell) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
