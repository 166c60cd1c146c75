//! Highlight reel CLI
//!
//! Submits a video to an AI analysis service and renders the returned
//! highlight windows as clips that play only their own slice of the source.
//!
//! # Usage
//!
//! ```bash
//! reel analyze --url https://example.com/talk.mp4 --max-clips 5
//! reel analyze --file talk.mp4 --mock --format json
//! reel normalize --payload response.json
//! reel preview --source talk.mp4 --payload response.json --clip 2 --speed 8
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use highlight_reel::app::DefaultAppContainer;
use highlight_reel::cli::{commands, Cli, Commands};
use highlight_reel::config_initialization::{initialize_configuration_hierarchy, ConfigOverrides};
use highlight_reel::domain::errors::DomainError;
use highlight_reel::utils::logging::{LoggingConfig, LoggingSystem};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            let message = match err.downcast_ref::<DomainError>() {
                Some(domain) => domain.user_message(),
                None => format!("{:#}", err),
            };
            eprintln!("Error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let overrides = config_overrides(&cli);
    let settings = initialize_configuration_hierarchy(&overrides)
        .await
        .context("Failed to load configuration")?;

    LoggingSystem::new(LoggingConfig {
        level: settings.log_level,
        format: cli.log_format,
        target: false,
    })
    .initialize()?;
    debug!(?settings, "Starting highlight reel");

    let container = DefaultAppContainer::new(settings);
    match cli.command {
        Commands::Analyze(args) => commands::analyze(args, &container).await,
        Commands::Normalize(args) => commands::normalize(args).await,
        Commands::Preview(args) => commands::preview(args, &container).await,
    }
}

/// Map command-line flags onto the top configuration layer
fn config_overrides(cli: &Cli) -> ConfigOverrides {
    let mut overrides = ConfigOverrides {
        config_file: cli.config.clone(),
        log_level: cli.log_level.clone(),
        ..Default::default()
    };

    match &cli.command {
        Commands::Analyze(args) => {
            if args.mock {
                overrides.mock_mode = Some(true);
            }
            overrides.max_clips = args.max_clips;
        }
        Commands::Preview(args) => {
            if args.no_fragments {
                overrides.use_fragments = Some(false);
            }
        }
        Commands::Normalize(_) => {}
    }

    overrides
}
