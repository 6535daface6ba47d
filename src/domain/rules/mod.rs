// Domain rules - Eager validation applied before any graph construction

use crate::domain::model::*;
use crate::error::{DemoReelError, DemoReelResult};

/// Validation rules for an assembled render request.
///
/// Everything here runs before the first filter node is built so a bad
/// configuration is rejected whole, never partially applied.
pub struct RenderRules;

impl RenderRules {
    /// Validate the segment list.
    pub fn validate_segments(segments: &[Segment]) -> DemoReelResult<()> {
        if segments.is_empty() {
            return Err(DemoReelError::InvalidConfig {
                field: "segments".to_string(),
                message: "at least one segment is required".to_string(),
            });
        }
        for (i, segment) in segments.iter().enumerate() {
            if segment.name.trim().is_empty() {
                return Err(DemoReelError::InvalidConfig {
                    field: format!("segments[{}].name", i),
                    message: "segment name must not be empty".to_string(),
                });
            }
            if !segment.trim_offset.is_finite() || segment.trim_offset < 0.0 {
                return Err(DemoReelError::InvalidConfig {
                    field: format!("segments[{}].trim_offset", i),
                    message: format!("trim offset must be a non-negative number, got {}", segment.trim_offset),
                });
            }
        }
        Ok(())
    }

    /// Validate per-boundary transition overrides against the segment count.
    ///
    /// For N segments there are exactly N-1 boundaries; a longer override list
    /// means the project file and the page list are out of sync.
    pub fn validate_boundaries(
        segment_count: usize,
        per_boundary: &[Option<TransitionSpec>],
    ) -> DemoReelResult<()> {
        let boundaries = segment_count.saturating_sub(1);
        if per_boundary.len() > boundaries {
            return Err(DemoReelError::InvalidConfig {
                field: "transitions.boundaries".to_string(),
                message: format!(
                    "{} boundary overrides given but only {} boundaries exist",
                    per_boundary.len(),
                    boundaries
                ),
            });
        }
        Ok(())
    }

    /// Validate the requested output formats.
    pub fn validate_formats(formats: &[OutputFormat]) -> DemoReelResult<()> {
        if formats.is_empty() {
            return Err(DemoReelError::InvalidConfig {
                field: "output.formats".to_string(),
                message: "at least one output format is required".to_string(),
            });
        }
        Ok(())
    }

    /// Validate the output frame geometry.
    pub fn validate_dimensions(width: u32, height: u32) -> DemoReelResult<()> {
        if width == 0 || height == 0 {
            return Err(DemoReelError::InvalidConfig {
                field: "output.resolution".to_string(),
                message: format!("{}x{} is not a valid resolution", width, height),
            });
        }
        // Chroma subsampling requires even dimensions
        if width % 2 != 0 || height % 2 != 0 {
            return Err(DemoReelError::InvalidConfig {
                field: "output.resolution".to_string(),
                message: format!("{}x{} must use even dimensions", width, height),
            });
        }
        Ok(())
    }

    /// Validate theme geometry.
    pub fn validate_theme(theme: &ThemeSpec) -> DemoReelResult<()> {
        if !theme.padding.is_finite() || theme.padding < 0.0 || theme.padding >= 0.5 {
            return Err(DemoReelError::InvalidConfig {
                field: "theme.padding".to_string(),
                message: format!(
                    "padding {} must be in [0, 0.5); 0.5 would leave no window",
                    theme.padding
                ),
            });
        }
        for (field, color) in [("theme.background", &theme.background), ("theme.bar_color", &theme.bar_color)] {
            if color.len() != 6 || !color.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(DemoReelError::InvalidConfig {
                    field: field.to_string(),
                    message: format!("'{}' is not a 6-digit hex color", color),
                });
            }
        }
        Ok(())
    }
}
