//! DemoReel CLI
//!
//! Assemble product-demo videos from recorded walkthrough segments.
//!
//! # Usage
//!
//! ```bash
//! demoreel render --project demo.toml
//! demoreel plan --project demo.toml --json
//! demoreel captions --project demo.toml --output demo.srt
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use demoreel::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level when set
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Render(args) => {
            info!("Executing render command");
            commands::render(args).await?;
        }
        Commands::Plan(args) => {
            commands::plan(args).await?;
        }
        Commands::Captions(args) => {
            info!("Executing captions command");
            commands::captions(args).await?;
        }
    }

    Ok(())
}
