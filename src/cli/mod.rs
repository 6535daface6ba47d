//! Command-line interface
//!
//! Argument parsing and command dispatch for the demoreel binary.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{CaptionsArgs, PlanArgs, RenderArgs};

/// DemoReel product-demo video assembler
///
/// Turns a set of recorded walkthrough segments into a polished demo video
/// with transitions, text overlays, burned-in captions, and window theming.
#[derive(Parser)]
#[command(name = "demoreel")]
#[command(about = "Assemble product-demo videos from recorded segments")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Render the project into its output formats
    Render(args::RenderArgs),
    /// Resolve the timeline and print the render plan without encoding
    Plan(args::PlanArgs),
    /// Generate the SRT caption file from segment narrations
    Captions(args::CaptionsArgs),
}
