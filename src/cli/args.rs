//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the render command
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Project file path (TOML)
    #[arg(short, long)]
    pub project: PathBuf,

    /// Override the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override the output formats (mp4, webm)
    #[arg(long, value_delimiter = ',')]
    pub format: Vec<String>,

    /// Skip caption generation even when narrations are present
    #[arg(long)]
    pub no_captions: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Project file path (TOML)
    #[arg(short, long)]
    pub project: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the captions command
#[derive(Args, Debug)]
pub struct CaptionsArgs {
    /// Project file path (TOML)
    #[arg(short, long)]
    pub project: PathBuf,

    /// Output SRT file path (default: <project stem>.srt in the output directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
