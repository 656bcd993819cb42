//! resume-matcher: multi-dimensional candidate/job match scoring

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use resume_matcher::cli::{self, Cli, Commands, ConfigAction};
use resume_matcher::input::loader;
use resume_matcher::models::MatchRequest;
use resume_matcher::output::formatter_for;
use resume_matcher::{Config, MatchEngine};
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if let Err(e) = run_command(cli).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    match cli.command {
        Commands::Match {
            candidate,
            job,
            request,
            output,
            save,
            offline,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if offline {
                info!("Offline mode: using local embedding and culture baselines");
                config = config.offline();
            }

            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };

            let request = match (request, candidate, job) {
                (Some(path), _, _) => loader::load_request(&path).await?,
                (None, Some(candidate), Some(job)) => MatchRequest {
                    candidate: Some(loader::load_candidate(&candidate).await?),
                    job: Some(loader::load_job(&job).await?),
                },
                _ => anyhow::bail!("either --request or both --candidate and --job are required"),
            };

            let engine = MatchEngine::from_config(&config).context("Failed to build match engine")?;
            let result = engine.evaluate_request(&request).await?;

            let rendered = formatter_for(format, &config.output).format_result(&result)?;
            match save {
                Some(path) => {
                    std::fs::write(&path, &rendered)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Saved match result to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let config = load_config(cli.config.as_deref())?;
                println!("# {}", config_path.display());
                println!("{}", toml::to_string_pretty(&config)?);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    Ok(config)
}
