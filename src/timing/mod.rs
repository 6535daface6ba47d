//! Segment timing resolution
//!
//! Turns raw recordings plus measured loading offsets into the usable
//! durations every downstream component (transitions, subtitles, total
//! duration math) consumes. Durations are probed once per segment and cached;
//! resolving the same timeline twice yields bit-identical values.

use tracing::{debug, warn};

use crate::domain::model::Segment;
use crate::error::DemoReelResult;
use crate::ports::DurationProbe;

/// Usable duration of the raw recording after discarding loading time.
///
/// Clamped at zero: a trim offset exceeding the raw duration marks a
/// degenerate segment that contributes nothing to the timeline rather than
/// aborting an otherwise-valid recording.
pub fn resolve_duration(raw_duration: f64, trim_offset: f64) -> f64 {
    if !raw_duration.is_finite() || !trim_offset.is_finite() {
        return 0.0;
    }
    (raw_duration - trim_offset.max(0.0)).max(0.0)
}

/// Timing of one segment on the output timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTiming {
    /// Trimmed duration in seconds
    pub duration: f64,
    /// Set when the probe failed or the trim consumed the whole recording;
    /// the segment stays in the input list but adds no visible time
    pub degenerate: bool,
}

/// Resolved durations for a whole segment list, in timeline order.
///
/// Built once per render; the filter planner, subtitle builder, and
/// orchestrator all read from the same cached values.
#[derive(Debug, Clone)]
pub struct SegmentTimeline {
    timings: Vec<SegmentTiming>,
}

impl SegmentTimeline {
    /// Probe every segment's recording and resolve its trimmed duration.
    ///
    /// A probe failure downgrades that segment to a degenerate zero-duration
    /// entry instead of failing the whole timeline; the warning carries the
    /// probe's own diagnostics.
    pub async fn resolve(
        segments: &[Segment],
        probe: &dyn DurationProbe,
    ) -> DemoReelResult<Self> {
        let mut timings = Vec::with_capacity(segments.len());
        for segment in segments {
            match probe.duration_secs(&segment.recording).await {
                Ok(raw) => {
                    let duration = resolve_duration(raw, segment.trim_offset);
                    if duration == 0.0 {
                        warn!(
                            "Segment '{}': trim offset {:.3}s consumes the whole {:.3}s recording",
                            segment.name, segment.trim_offset, raw
                        );
                    } else {
                        debug!(
                            "Segment '{}': raw {:.3}s, trim {:.3}s, usable {:.3}s",
                            segment.name, raw, segment.trim_offset, duration
                        );
                    }
                    timings.push(SegmentTiming {
                        duration,
                        degenerate: duration == 0.0,
                    });
                }
                Err(e) => {
                    warn!(
                        "Segment '{}': duration probe failed ({}); contributing no time",
                        segment.name, e
                    );
                    timings.push(SegmentTiming {
                        duration: 0.0,
                        degenerate: true,
                    });
                }
            }
        }
        Ok(Self { timings })
    }

    /// Build a timeline from already-known durations.
    pub fn from_durations(durations: &[f64]) -> Self {
        Self {
            timings: durations
                .iter()
                .map(|&d| {
                    let duration = d.max(0.0);
                    SegmentTiming {
                        duration,
                        degenerate: duration == 0.0,
                    }
                })
                .collect(),
        }
    }

    /// Trimmed durations in timeline order.
    pub fn durations(&self) -> Vec<f64> {
        self.timings.iter().map(|t| t.duration).collect()
    }

    /// Per-segment timing entries.
    pub fn timings(&self) -> &[SegmentTiming] {
        &self.timings
    }

    pub fn len(&self) -> usize {
        self.timings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}
