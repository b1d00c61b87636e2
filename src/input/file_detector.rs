//! File type detection

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(FileType::Unknown)
    }

    /// Map an upload's declared content type; parameters such as `charset` are ignored.
    pub fn from_mime(content_type: &str) -> Self {
        let essence = content_type.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "application/pdf" => FileType::Pdf,
            "text/plain" => FileType::Text,
            "text/markdown" | "text/x-markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn is_pdf(&self) -> bool {
        matches!(self, FileType::Pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("md"), FileType::Markdown);
        assert_eq!(FileType::from_extension("txt"), FileType::Text);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(FileType::from_path(Path::new("cv/resume.pdf")), FileType::Pdf);
        assert_eq!(FileType::from_path(Path::new("README")), FileType::Unknown);
    }

    #[test]
    fn test_from_mime() {
        assert!(FileType::from_mime("application/pdf").is_pdf());
        assert_eq!(FileType::from_mime("text/plain; charset=utf-8"), FileType::Text);
        assert_eq!(FileType::from_mime("image/png"), FileType::Unknown);
    }
}
