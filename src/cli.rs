//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Multi-dimensional candidate/job match scoring")]
#[command(long_about = "Score a candidate profile against a job posting across skills, experience, education, text similarity and culture fit, with a fairness adjustment and plain-language explanations")]
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
    /// Score a candidate against a job posting
    Match {
        /// Candidate profile (JSON)
        #[arg(long, required_unless_present = "request")]
        candidate: Option<PathBuf>,

        /// Job posting (JSON)
        #[arg(short, long, required_unless_present = "request")]
        job: Option<PathBuf>,

        /// Combined request file with `candidate` and `job` objects (JSON)
        #[arg(short, long, conflicts_with_all = ["candidate", "job"])]
        request: Option<PathBuf>,

        /// Output format: console, json (defaults to the configured format)
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Use only the local embedding and culture baselines
        #[arg(long)]
        offline: bool,
    },

    /// Show or reset configuration
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
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}. Supported: console, json", format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_match_requires_inputs() {
        assert!(Cli::try_parse_from(["resume-matcher", "match"]).is_err());
        assert!(Cli::try_parse_from(["resume-matcher", "match", "--candidate", "c.json", "-j", "j.json"]).is_ok());
        assert!(Cli::try_parse_from(["resume-matcher", "match", "-r", "req.json"]).is_ok());
        assert!(Cli::try_parse_from(["resume-matcher", "match", "-r", "req.json", "-j", "j.json"]).is_err());
    }
}
