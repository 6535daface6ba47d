//! Project file loading
//!
//! Parses the TOML project file into typed configuration and validates it
//! eagerly: a bad field is reported by name before any probing or graph
//! construction starts, and a rejected project is never partially applied.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::domain::model::*;
use crate::domain::rules::RenderRules;
use crate::error::{DemoReelError, DemoReelResult};

/// Default output width in pixels
pub const DEFAULT_WIDTH: u32 = 1280;
/// Default output height in pixels
pub const DEFAULT_HEIGHT: u32 = 720;
/// Default output frame rate
pub const DEFAULT_FPS: u32 = 30;

// Raw shapes mirroring the TOML document, converted and validated below.

#[derive(Debug, Deserialize)]
struct RawProject {
    project: Option<RawMeta>,
    output: Option<RawOutput>,
    transitions: Option<RawTransitions>,
    overlay: Option<RawOverlay>,
    subtitles: Option<RawSubtitles>,
    theme: Option<RawTheme>,
    audio: Option<RawAudio>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawMeta {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    formats: Option<Vec<String>>,
    directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawTransitions {
    style: Option<String>,
    duration: Option<f64>,
    #[serde(default)]
    boundaries: Vec<RawBoundary>,
}

#[derive(Debug, Deserialize)]
struct RawBoundary {
    index: usize,
    style: String,
    duration: f64,
}

#[derive(Debug, Deserialize)]
struct RawOverlay {
    top: Option<RawBand>,
    bottom: Option<RawBand>,
}

#[derive(Debug, Deserialize)]
struct RawBand {
    text: String,
    height: Option<u32>,
    font_size: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawSubtitles {
    enabled: Option<bool>,
    font_size: Option<u32>,
    position: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    name: Option<String>,
    background: Option<String>,
    bar_color: Option<String>,
    title_bar: Option<bool>,
    corner_radius: Option<u32>,
    padding: Option<f64>,
    shadow: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawAudio {
    track: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    name: String,
    recording: PathBuf,
    #[serde(default)]
    trim: f64,
    narration: Option<String>,
}

/// Output geometry, frame rate, formats and destination directory.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub formats: Vec<OutputFormat>,
    pub directory: PathBuf,
}

/// Fully validated project configuration at the core's boundary.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub name: String,
    pub output: RenderSettings,
    pub segments: Vec<Segment>,
    /// Transition applied at every boundary unless overridden
    pub global_transition: Option<TransitionSpec>,
    /// Per-boundary overrides, indexed by boundary; `None` falls back to global
    pub boundary_transitions: Vec<Option<TransitionSpec>>,
    pub overlay: OverlaySpec,
    /// `None` disables caption generation entirely
    pub subtitles: Option<SubtitleStyle>,
    pub theme: Option<ThemeSpec>,
    /// Pre-synthesized narration audio track to mux in
    pub audio_track: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load and validate a project file.
    pub fn load(path: &Path) -> DemoReelResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DemoReelError::ProjectParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let raw: RawProject =
            toml::from_str(&content).map_err(|e| DemoReelError::ProjectParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!("Loaded project file {}", path.display());
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawProject) -> DemoReelResult<Self> {
        let segments: Vec<Segment> = raw
            .segments
            .into_iter()
            .map(|s| {
                let mut segment = Segment::new(s.name, s.recording, s.trim);
                segment.narration = s.narration;
                segment
            })
            .collect();
        RenderRules::validate_segments(&segments)?;

        let output = {
            let raw_output = raw.output.unwrap_or(RawOutput {
                width: None,
                height: None,
                fps: None,
                formats: None,
                directory: None,
            });
            let width = raw_output.width.unwrap_or(DEFAULT_WIDTH);
            let height = raw_output.height.unwrap_or(DEFAULT_HEIGHT);
            RenderRules::validate_dimensions(width, height)?;
            let formats = match raw_output.formats {
                Some(tags) => tags
                    .iter()
                    .map(|t| OutputFormat::parse(t))
                    .collect::<DemoReelResult<Vec<_>>>()?,
                None => vec![OutputFormat::Mp4],
            };
            RenderRules::validate_formats(&formats)?;
            RenderSettings {
                width,
                height,
                fps: raw_output.fps.unwrap_or(DEFAULT_FPS),
                formats,
                directory: raw_output.directory.unwrap_or_else(|| PathBuf::from("out")),
            }
        };

        let (global_transition, boundary_transitions) = match raw.transitions {
            Some(t) => {
                let global = match (t.style, t.duration) {
                    (Some(style), Some(duration)) => Some(TransitionSpec::new(
                        TransitionStyle::parse(&style)?,
                        duration,
                    )?),
                    (None, None) => None,
                    _ => {
                        return Err(DemoReelError::InvalidConfig {
                            field: "transitions".to_string(),
                            message: "style and duration must be given together".to_string(),
                        })
                    }
                };
                let boundaries = segments.len().saturating_sub(1);
                let mut per_boundary: Vec<Option<TransitionSpec>> = vec![None; boundaries];
                for b in t.boundaries {
                    if b.index >= boundaries {
                        return Err(DemoReelError::InvalidConfig {
                            field: format!("transitions.boundaries[{}]", b.index),
                            message: format!("only {} boundaries exist", boundaries),
                        });
                    }
                    per_boundary[b.index] =
                        Some(TransitionSpec::new(TransitionStyle::parse(&b.style)?, b.duration)?);
                }
                RenderRules::validate_boundaries(segments.len(), &per_boundary)?;
                (global, per_boundary)
            }
            None => (None, Vec::new()),
        };

        let overlay = match raw.overlay {
            Some(o) => OverlaySpec {
                top: o.top.map(|b| {
                    let mut band = OverlayBand::top(b.text);
                    if let Some(h) = b.height {
                        band.height = h;
                    }
                    if let Some(fs) = b.font_size {
                        band.font_size = fs;
                    }
                    band
                }),
                bottom: o.bottom.map(|b| {
                    let mut band = OverlayBand::bottom(b.text);
                    if let Some(h) = b.height {
                        band.height = h;
                    }
                    if let Some(fs) = b.font_size {
                        band.font_size = fs;
                    }
                    band
                }),
            },
            None => OverlaySpec::default(),
        };

        let subtitles = match raw.subtitles {
            Some(s) if s.enabled.unwrap_or(true) => {
                let mut style = SubtitleStyle::default();
                if let Some(fs) = s.font_size {
                    style.font_size = fs;
                }
                if let Some(pos) = s.position {
                    style.position = match pos.to_lowercase().as_str() {
                        "bottom" => SubtitlePosition::Bottom,
                        "top" => SubtitlePosition::Top,
                        other => {
                            return Err(DemoReelError::InvalidConfig {
                                field: "subtitles.position".to_string(),
                                message: format!("'{}' is not 'top' or 'bottom'", other),
                            })
                        }
                    };
                }
                Some(style)
            }
            _ => None,
        };

        let theme = match raw.theme {
            Some(t) => {
                let mut theme = match t.name {
                    Some(name) => ThemeSpec::named(&name)?,
                    None => ThemeSpec::named("midnight")?,
                };
                if let Some(bg) = t.background {
                    theme.background = bg;
                }
                if let Some(bar) = t.bar_color {
                    theme.bar_color = bar;
                }
                if let Some(tb) = t.title_bar {
                    theme.title_bar = tb;
                }
                if let Some(r) = t.corner_radius {
                    theme.corner_radius = r;
                }
                if let Some(p) = t.padding {
                    theme.padding = p;
                }
                if let Some(s) = t.shadow {
                    theme.shadow = s;
                }
                RenderRules::validate_theme(&theme)?;
                Some(theme)
            }
            None => None,
        };

        Ok(Self {
            name: raw
                .project
                .and_then(|m| m.name)
                .unwrap_or_else(|| "demo".to_string()),
            output,
            segments,
            global_transition,
            boundary_transitions,
            overlay,
            subtitles,
            theme,
            audio_track: raw.audio.map(|a| a.track),
        })
    }
}
