//! CLI module for highlight-reel
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// Highlight reel
///
/// Submits a video to an AI analysis service and plays back the highlight
/// clips it returns, each bounded to its own time window.
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(about = "Find and preview the highlight clips of a video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, default_value = "pretty", env = "REEL_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Configuration file (defaults to reel.toml or config/reel.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit a video for analysis and list its highlight clips
    Analyze(args::AnalyzeArgs),
    /// Normalize a saved provider payload into canonical clips
    Normalize(args::NormalizeArgs),
    /// Play one clip window against a simulated media element
    Preview(args::PreviewArgs),
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
    fn test_analyze_requires_one_input() {
        assert!(Cli::try_parse_from(["reel", "analyze"]).is_err());
        assert!(Cli::try_parse_from([
            "reel", "analyze", "--file", "a.mp4", "--url", "https://example.com/v"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["reel", "analyze", "--url", "https://example.com/v"]).is_ok());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "reel", "normalize", "--payload", "-", "--log-level", "debug", "--log-format", "json",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format, LogFormat::Json);

        assert!(Cli::try_parse_from([
            "reel", "normalize", "--payload", "-", "--log-format", "xml",
        ])
        .is_err());
    }

    #[test]
    fn test_max_clips_must_be_positive() {
        let url = "https://example.com/v";
        assert!(Cli::try_parse_from(["reel", "analyze", "--url", url, "--max-clips", "0"]).is_err());
        assert!(Cli::try_parse_from(["reel", "analyze", "--url", url, "--max-clips", "4294967296"]).is_err());

        let cli = Cli::try_parse_from(["reel", "analyze", "--url", url, "--max-clips", "2"]).unwrap();
        match cli.command {
            Commands::Analyze(args) => assert_eq!(args.max_clips, Some(2)),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
