//! Resume matcher library: ATS-style scoring of resumes against job descriptions

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{MatcherError, Result};
pub use processing::ats_matcher::{AtsMatcher, AtsOutcome, AtsScore, MatcherConfig};
