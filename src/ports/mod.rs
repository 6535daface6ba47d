// Ports - Interface definitions (contracts)
//
// External collaborators the core never implements itself: the browser
// recorder, the media probe/encoder binaries, AI text/speech services, and
// license gating. The core consumes these through the traits below and runs
// identically regardless of which adapter is behind them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::DemoReelResult;

/// A page/view the recording step should capture.
#[derive(Debug, Clone)]
pub struct PageTarget {
    pub name: String,
    pub url: String,
}

/// The recording step's result: a raw file plus where clean content begins.
///
/// The producer guarantees `trim_offset` never exceeds the recording's total
/// duration.
#[derive(Debug, Clone)]
pub struct RawRecording {
    pub path: PathBuf,
    /// Seconds of loading noise at the start of the file
    pub trim_offset: f64,
}

/// Port for the headless-browser recording step.
#[async_trait]
pub trait RecordingProducer: Send + Sync {
    /// Record one page and report where its clean content begins.
    async fn record(&self, target: &PageTarget) -> DemoReelResult<RawRecording>;
}

/// Port for probing a recording's total duration.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Total duration in seconds. Failure propagates as a typed error,
    /// never a silent zero.
    async fn duration_secs(&self, path: &Path) -> DemoReelResult<f64>;
}

/// Port for the external encode command.
#[async_trait]
pub trait EncodeRunner: Send + Sync {
    /// Run one encode invocation with the prepared argument list.
    /// A nonzero exit surfaces the tool's diagnostic output verbatim.
    async fn run(&self, format_tag: &str, args: &[String]) -> DemoReelResult<()>;
}

/// Port for AI narration-script generation from a page screenshot.
///
/// Same inputs yield the same category of output, but the text itself is
/// non-deterministic; callers must not assume byte-stable results.
#[async_trait]
pub trait NarrationGenerator: Send + Sync {
    async fn narrate(&self, screenshot_png: &[u8], segment_name: &str) -> DemoReelResult<String>;
}

/// Port for text-to-speech synthesis.
///
/// Text exceeding the service's size limit must be pre-chunked by the caller
/// and the resulting clips concatenated into one audio track.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> DemoReelResult<Vec<u8>>;
}

/// Port for license gating. Enforcement wraps the pipeline from outside;
/// nothing in the core branches on its result.
pub trait LicenseGate: Send + Sync {
    /// Names of configured features requiring a paid entitlement.
    fn gated_features(&self, config: &crate::config::ProjectConfig) -> Vec<String>;
}
