//! resume-matcher: ATS-style resume and job description matcher

use clap::Parser;
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::input::manager::InputManager;
use resume_matcher::input::request::ScoreRequest;
use resume_matcher::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_matcher::output::report::ScoreReport;
use resume_matcher::{AtsMatcher, Config, MatcherConfig, MatcherError, Result};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            require_pdf,
            detailed,
            output,
            save,
        } => {
            cli::validate_file_extension(&resume, &["pdf", "txt", "md"])
                .map_err(|e| MatcherError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| MatcherError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(MatcherError::InvalidInput)?,
                None => config.output.format,
            };

            let mut input_manager = InputManager::new();
            let resume_text = input_manager.extract_resume(&resume, require_pdf).await?;
            let job_text = input_manager.extract_text(&job).await?;
            info!(
                "Extracted {} resume characters and {} job description characters",
                resume_text.len(),
                job_text.len()
            );

            let matcher = AtsMatcher::new(MatcherConfig::from_config(&config));
            let score = matcher.calculate_ats_score(&resume_text, &job_text).into_score();
            let report = ScoreReport::new(
                score,
                resume.display().to_string(),
                job.display().to_string(),
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;

            match save {
                Some(save) => {
                    let path = resolve_save_path(&save, &output_format, &resume.display().to_string());
                    save_report_to_file(&rendered, &path)?;
                    info!("Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::ScoreJson { input } => {
            let request = ScoreRequest::read(input.as_deref()).await?;
            let matcher = AtsMatcher::new(MatcherConfig::from_config(&config));
            let score = matcher
                .calculate_ats_score(&request.resume_text, &request.job_description)
                .into_score();
            println!("{}", serde_json::to_string_pretty(&score)?);
        }

        Commands::Keywords { input, top } => {
            if top == 0 {
                return Err(MatcherError::InvalidInput("--top must be positive".to_string()));
            }

            let mut input_manager = InputManager::new();
            let text = input_manager.extract_text(&input).await?;
            let matcher = AtsMatcher::new(MatcherConfig::from_config(&config));
            let keywords = matcher.extract_keywords(&text, top);

            if keywords.is_empty() {
                println!("No keywords found in {}", input.display());
            }
            for (i, keyword) in keywords.iter().enumerate() {
                println!("{:>3}. {:<30} {:.4}", i + 1, keyword.term, keyword.weight);
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| MatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("⚙️  Current Configuration\n");
                println!("{}", content);
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save()?;
                println!("✅ Configuration reset to defaults at {}", Config::config_path().display());
            }
        },
    }

    Ok(())
}
