//! Output formatters for score reports

use crate::config::OutputFormat;
use crate::error::{MatcherError, Result};
use crate::output::report::{MatchVerdict, ScoreReport};
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

/// Trait for formatting score reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for sharing reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_verdict_badge(&self, verdict: MatchVerdict) -> String {
        let color = match verdict {
            MatchVerdict::Good => Color::Green,
            MatchVerdict::Moderate => Color::Yellow,
            MatchVerdict::Low => Color::Red,
        };
        let badge = verdict.label().to_uppercase();

        if self.use_colors {
            format!("{} [{}]", verdict.icon(), badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_keyword_list(&self, title: &str, keywords: &[String], color: Color) -> String {
        if keywords.is_empty() {
            return format!("{}: none\n", title);
        }
        let joined = keywords.join(", ");
        format!("{}: {}\n", title, self.colorize(&joined, color))
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let score = &report.score;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ATS MATCH REPORT", 1));
        output.push_str(&format!(
            "Resume: {} | Job: {}\n",
            report.metadata.resume_source, report.metadata.job_source
        ));
        output.push_str(&format!(
            "Generated: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&self.format_header("Scores", 2));
        output.push_str(&format!(
            "Overall Score: {:.2}% {}\n",
            score.overall_score,
            self.format_verdict_badge(report.verdict())
        ));
        output.push_str(&format!("🧠 Similarity: {:.2}%\n", score.similarity_score));
        output.push_str(&format!("🎯 Keyword Match: {:.2}%\n", score.keyword_match));

        if let Some(error) = &score.error {
            output.push_str(&format!("{}\n", self.colorize(&format!("⚠️  {}", error), Color::Red)));
        }

        output.push_str(&self.format_header("Keywords", 2));
        output.push_str(&self.format_keyword_list("✅ Matched", &score.matched_keywords, Color::Green));
        output.push_str(&self.format_keyword_list("❌ Missing", &score.missing_keywords, Color::Red));

        if self.detailed {
            output.push_str(&self.format_header("Top Job Keywords", 3));
            for (i, keyword) in score.job_keywords.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, keyword));
            }

            output.push_str(&self.format_header("Top Resume Keywords", 3));
            for (i, keyword) in score.resume_keywords.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, keyword));
            }
        }

        output.push_str(&self.format_header("💡 Recommendations", 2));
        for (i, rec) in score.recommendations.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, rec));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn keyword_line(keywords: &[String]) -> String {
        if keywords.is_empty() {
            "_none_".to_string()
        } else {
            keywords
                .iter()
                .map(|k| format!("`{}`", k))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let score = &report.score;
        let mut md = String::new();

        md.push_str("# ATS Match Report\n\n");

        if self.include_metadata {
            md.push_str(&format!("- **Resume:** {}\n", report.metadata.resume_source));
            md.push_str(&format!("- **Job description:** {}\n", report.metadata.job_source));
            md.push_str(&format!(
                "- **Generated:** {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            md.push_str(&format!("- **Version:** {}\n\n", report.metadata.tool_version));
        }

        md.push_str("## Scores\n\n");
        md.push_str("| Metric | Value |\n|---|---|\n");
        md.push_str(&format!("| Overall | {:.2}% |\n", score.overall_score));
        md.push_str(&format!("| Similarity | {:.2}% |\n", score.similarity_score));
        md.push_str(&format!("| Keyword match | {:.2}% |\n\n", score.keyword_match));
        md.push_str(&format!("**Verdict:** {}\n\n", report.verdict().label()));

        if let Some(error) = &score.error {
            md.push_str(&format!("> **Error:** {}\n\n", error));
        }

        md.push_str("## Keywords\n\n");
        md.push_str(&format!("- **Matched:** {}\n", Self::keyword_line(&score.matched_keywords)));
        md.push_str(&format!("- **Missing:** {}\n\n", Self::keyword_line(&score.missing_keywords)));

        md.push_str("## Recommendations\n\n");
        for rec in &score.recommendations {
            md.push_str(&format!("- {}\n", rec));
        }

        Ok(md)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        MatcherError::OutputFormatting(format!("Failed to write '{}': {}", file_path.display(), e))
    })
}

/// Where `score --save` writes: a directory gets a generated file name.
pub fn resolve_save_path(save: &Path, format: &OutputFormat, resume_name: &str) -> PathBuf {
    if save.is_dir() {
        save.join(suggest_filename(format, resume_name, true))
    } else {
        save.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_ats{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_ats{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_ats{}.md", base_name, timestamp_suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::ats_matcher::AtsMatcher;

    fn sample_report() -> ScoreReport {
        let score = AtsMatcher::default()
            .calculate_ats_score(
                "Rust engineer building async services with tokio and postgres",
                "Hiring Rust engineer for async services, tokio, kafka and postgres",
            )
            .into_score();
        ScoreReport::new(score, "resume.md", "job.txt")
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&sample_report())
            .unwrap();

        assert!(output.contains("ATS MATCH REPORT"));
        assert!(output.contains("Overall Score:"));
        assert!(output.contains("Top Job Keywords"));
        assert!(output.contains("Recommendations"));
        assert!(!output.contains("\u{1b}["));
    }

    #[test]
    fn test_json_round_trip_fields() {
        let report = sample_report();
        let json = JsonFormatter::new(false).format_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["score"]["overall_score"], serde_json::json!(report.score.overall_score));
        assert_eq!(value["metadata"]["resume_source"], "resume.md");
    }

    #[test]
    fn test_markdown_sections() {
        let md = MarkdownFormatter::new(true).format_report(&sample_report()).unwrap();
        assert!(md.starts_with("# ATS Match Report"));
        assert!(md.contains("## Keywords"));
        assert!(md.contains("**Resume:** resume.md"));
    }

    #[test]
    fn test_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, true, false);
        let report = sample_report();
        for format in [OutputFormat::Console, OutputFormat::Json, OutputFormat::Markdown] {
            assert!(!generator.generate_report(&report, &format).unwrap().is_empty());
        }
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(&OutputFormat::Json, "docs/jane_resume.pdf", false),
            "jane_resume_ats.json"
        );
        assert!(suggest_filename(&OutputFormat::Markdown, "cv.txt", true).ends_with(".md"));
    }

    #[test]
    fn test_resolve_save_path() {
        let dir = tempfile::tempdir().unwrap();

        let in_dir = resolve_save_path(dir.path(), &OutputFormat::Json, "docs/jane_resume.pdf");
        assert_eq!(in_dir.parent(), Some(dir.path()));
        let name = in_dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("jane_resume_ats_"));
        assert!(name.ends_with(".json"));

        let file = dir.path().join("report.md");
        assert_eq!(resolve_save_path(&file, &OutputFormat::Markdown, "cv.txt"), file);
    }
}
