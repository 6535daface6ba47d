//! DemoReel product-demo video assembler
//!
//! Library crate behind the demoreel binary. Resolves segment timing from
//! recorded walkthrough footage, plans cross-fade transitions, and assembles
//! a single filter graph covering normalization, text overlays, caption
//! burn-in, and window theming, then drives the external encoder once per
//! requested output format.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod encode;
pub mod error;
pub mod filter;
pub mod overlay;
pub mod planner;
pub mod ports;
pub mod subtitle;
pub mod theme;
pub mod timing;
pub mod utils;

// Re-export commonly used types
pub use config::ProjectConfig;
pub use domain::model::{
    OutputArtifact, OutputFormat, OverlaySpec, Segment, SubtitleStyle, ThemeSpec,
    TransitionSpec, TransitionStyle,
};
pub use error::{DemoReelError, DemoReelResult};
pub use timing::SegmentTimeline;
