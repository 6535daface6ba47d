//! FFmpeg adapter for encode execution
//!
//! Runs the `ffmpeg` binary with a fully prepared argument list. A nonzero
//! exit becomes `EncodeFailed` carrying ffmpeg's own stderr verbatim so users
//! can diagnose codec and filter issues directly.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{DemoReelError, DemoReelResult};
use crate::ports::EncodeRunner;

/// Encode runner backed by the `ffmpeg` binary.
pub struct FfmpegEncodeRunner {
    binary: String,
}

impl FfmpegEncodeRunner {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    /// Use a non-default ffmpeg binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfmpegEncodeRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EncodeRunner for FfmpegEncodeRunner {
    async fn run(&self, format_tag: &str, args: &[String]) -> DemoReelResult<()> {
        debug!("ffmpeg args ({}): {}", format_tag, args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|e| DemoReelError::EncodeFailed {
                format: format_tag.to_string(),
                diagnostics: format!("failed to launch {}: {}", self.binary, e),
            })?;

        if !output.status.success() {
            return Err(DemoReelError::EncodeFailed {
                format: format_tag.to_string(),
                diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        info!("ffmpeg finished {} encode", format_tag);
        Ok(())
    }
}
