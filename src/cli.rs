//! CLI interface for the resume matcher

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "ATS-style resume and job description matcher")]
#[command(long_about = "Score how well a resume matches a job description using TF-IDF similarity and keyword gap analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume file against a job description file
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Reject resumes that are not PDFs
        #[arg(long)]
        require_pdf: bool,

        /// Show the top keywords of both documents
        #[arg(short, long)]
        detailed: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or to a generated file name inside a directory
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Score a JSON request {"resume_text", "job_description"} and print JSON
    ScoreJson {
        /// Request file; stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Print the top keywords of a document
    Keywords {
        /// Path to a TXT, MD or PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Maximum number of keywords
        #[arg(short, long, default_value_t = 20)]
        top: usize,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
