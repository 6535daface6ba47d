//! FFprobe adapter for duration probing
//!
//! Shells out to the `ffprobe` binary and parses its CSV output. Failures are
//! typed so callers can tell a missing binary (retry won't help) from a busy
//! system (it might).

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{DemoReelError, DemoReelResult, UpstreamKind};
use crate::ports::DurationProbe;

/// Duration probe backed by the `ffprobe` binary.
pub struct FfprobeDurationProbe {
    binary: String,
}

impl FfprobeDurationProbe {
    pub fn new() -> Self {
        Self {
            binary: "ffprobe".to_string(),
        }
    }

    /// Use a non-default ffprobe binary.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeDurationProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn duration_secs(&self, path: &Path) -> DemoReelResult<f64> {
        if !path.exists() {
            return Err(DemoReelError::RecordingNotFound {
                path: path.display().to_string(),
            });
        }

        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "csv=p=0",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| DemoReelError::ProbeError {
                path: path.display().to_string(),
                message: format!("failed to launch {}: {}", self.binary, e),
                kind: UpstreamKind::Transient,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DemoReelError::ProbeError {
                path: path.display().to_string(),
                message: stderr.trim().to_string(),
                kind: UpstreamKind::Permanent,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration: f64 =
            stdout
                .trim()
                .parse()
                .map_err(|_| DemoReelError::ProbeError {
                    path: path.display().to_string(),
                    message: format!("non-numeric duration: '{}'", stdout.trim()),
                    kind: UpstreamKind::Permanent,
                })?;

        debug!("Probed {}: {:.3}s", path.display(), duration);
        Ok(duration)
    }
}
