//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args, ValueEnum};

/// How command results are printed
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "url"])))]
pub struct AnalyzeArgs {
    /// Local video file to upload
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Remote video URL (http or https)
    #[arg(short, long)]
    pub url: Option<String>,

    /// Maximum number of clips to request
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_clips: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Skip the provider and return the canned clip set
    #[arg(long)]
    pub mock: bool,
}

/// Arguments for the normalize command
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Provider payload as JSON, or `-` for stdin
    #[arg(short, long)]
    pub payload: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Merge title words into the hashtags
    #[arg(long)]
    pub enrich_hashtags: bool,
}

/// Arguments for the preview command
#[derive(Args, Debug)]
pub struct PreviewArgs {
    /// Master source: local video file or http(s) URL
    #[arg(short, long)]
    pub source: String,

    /// Provider payload as JSON, or `-` for stdin
    #[arg(short, long)]
    pub payload: String,

    /// Clip id, or 1-based position in the list (default: first clip)
    #[arg(short, long)]
    pub clip: Option<String>,

    /// Length of the simulated source in seconds (default: end of the last clip)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Milliseconds between clock ticks
    #[arg(long, default_value = "50")]
    pub tick_ms: u64,

    /// Media seconds per wall-clock second
    #[arg(long, default_value = "1.0")]
    pub speed: f64,

    /// Enforce the window end without `#t=` fragment addressing
    #[arg(long)]
    pub no_fragments: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}
