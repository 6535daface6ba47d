// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DemoReelError, DemoReelResult};

/// Minimum accepted cross-fade duration in seconds
pub const MIN_TRANSITION_SECS: f64 = 0.1;
/// Maximum accepted cross-fade duration in seconds
pub const MAX_TRANSITION_SECS: f64 = 5.0;

/// Default height of the top overlay band in pixels
pub const TOP_BAND_HEIGHT: u32 = 120;
/// Default font size for the top overlay band
pub const TOP_BAND_FONT_SIZE: u32 = 42;
/// Default height of the bottom overlay band in pixels
pub const BOTTOM_BAND_HEIGHT: u32 = 100;
/// Default font size for the bottom overlay band
pub const BOTTOM_BAND_FONT_SIZE: u32 = 32;

/// One recorded page of the demo, in timeline order.
///
/// `trim_offset` marks how many seconds of loading noise to discard from the
/// start of the raw recording. The recording step guarantees it never exceeds
/// the recording's total duration; a violation is clamped, not fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Display name of the page/view
    pub name: String,
    /// Path to the raw recording produced by the recording step
    pub recording: PathBuf,
    /// Seconds of loading to discard from the start of the recording
    pub trim_offset: f64,
    /// Narration text, supplied in the project file or back-filled by an AI step
    pub narration: Option<String>,
}

impl Segment {
    /// Create a segment with no narration.
    pub fn new(name: impl Into<String>, recording: impl Into<PathBuf>, trim_offset: f64) -> Self {
        Self {
            name: name.into(),
            recording: recording.into(),
            trim_offset: trim_offset.max(0.0),
            narration: None,
        }
    }

    /// Attach narration text.
    pub fn with_narration(mut self, narration: impl Into<String>) -> Self {
        self.narration = Some(narration.into());
        self
    }
}

/// Named cross-fade styles accepted at segment boundaries.
///
/// The set is closed: these are the styles the downstream encoder implements,
/// so an unknown name is a configuration error, not a passthrough string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    Fade,
    FadeBlack,
    FadeWhite,
    Dissolve,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    CircleOpen,
    CircleClose,
    Radial,
    Pixelize,
    SmoothLeft,
    SmoothRight,
}

impl TransitionStyle {
    /// Name understood by the encoder's xfade operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionStyle::Fade => "fade",
            TransitionStyle::FadeBlack => "fadeblack",
            TransitionStyle::FadeWhite => "fadewhite",
            TransitionStyle::Dissolve => "dissolve",
            TransitionStyle::WipeLeft => "wipeleft",
            TransitionStyle::WipeRight => "wiperight",
            TransitionStyle::WipeUp => "wipeup",
            TransitionStyle::WipeDown => "wipedown",
            TransitionStyle::SlideLeft => "slideleft",
            TransitionStyle::SlideRight => "slideright",
            TransitionStyle::SlideUp => "slideup",
            TransitionStyle::SlideDown => "slidedown",
            TransitionStyle::CircleOpen => "circleopen",
            TransitionStyle::CircleClose => "circleclose",
            TransitionStyle::Radial => "radial",
            TransitionStyle::Pixelize => "pixelize",
            TransitionStyle::SmoothLeft => "smoothleft",
            TransitionStyle::SmoothRight => "smoothright",
        }
    }

    /// Parse a style name as it appears in project files.
    pub fn parse(name: &str) -> DemoReelResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "fade" => Ok(TransitionStyle::Fade),
            "fadeblack" => Ok(TransitionStyle::FadeBlack),
            "fadewhite" => Ok(TransitionStyle::FadeWhite),
            "dissolve" => Ok(TransitionStyle::Dissolve),
            "wipeleft" => Ok(TransitionStyle::WipeLeft),
            "wiperight" => Ok(TransitionStyle::WipeRight),
            "wipeup" => Ok(TransitionStyle::WipeUp),
            "wipedown" => Ok(TransitionStyle::WipeDown),
            "slideleft" => Ok(TransitionStyle::SlideLeft),
            "slideright" => Ok(TransitionStyle::SlideRight),
            "slideup" => Ok(TransitionStyle::SlideUp),
            "slidedown" => Ok(TransitionStyle::SlideDown),
            "circleopen" => Ok(TransitionStyle::CircleOpen),
            "circleclose" => Ok(TransitionStyle::CircleClose),
            "radial" => Ok(TransitionStyle::Radial),
            "pixelize" => Ok(TransitionStyle::Pixelize),
            "smoothleft" => Ok(TransitionStyle::SmoothLeft),
            "smoothright" => Ok(TransitionStyle::SmoothRight),
            other => Err(DemoReelError::UnknownTransition {
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (style, duration) pair describing the cross-fade at one boundary.
///
/// Supplied globally (every boundary) or per-boundary (overrides the global
/// value at that boundary only). Absence means a hard cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub style: TransitionStyle,
    /// Cross-fade length in seconds, 0.1-5.0
    pub duration: f64,
}

impl TransitionSpec {
    /// Create a validated transition spec.
    pub fn new(style: TransitionStyle, duration: f64) -> DemoReelResult<Self> {
        if !duration.is_finite()
            || duration < MIN_TRANSITION_SECS
            || duration > MAX_TRANSITION_SECS
        {
            return Err(DemoReelError::TransitionDurationOutOfRange { duration });
        }
        Ok(Self { style, duration })
    }
}

/// One text band of the overlay: semi-transparent box plus centered text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayBand {
    pub text: String,
    /// Band height in pixels
    pub height: u32,
    /// Text size in points
    pub font_size: u32,
}

impl OverlayBand {
    /// Band anchored at the top edge with the default geometry.
    pub fn top(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            height: TOP_BAND_HEIGHT,
            font_size: TOP_BAND_FONT_SIZE,
        }
    }

    /// Band anchored at the bottom edge with the default geometry.
    pub fn bottom(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            height: BOTTOM_BAND_HEIGHT,
            font_size: BOTTOM_BAND_FONT_SIZE,
        }
    }
}

/// Optional top/bottom text bands composited over the final video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlaySpec {
    pub top: Option<OverlayBand>,
    pub bottom: Option<OverlayBand>,
}

impl OverlaySpec {
    /// True when neither band is configured.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }
}

/// Vertical anchor for burned-in captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitlePosition {
    #[default]
    Bottom,
    Top,
}

/// Caption styling for the burn-in filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleStyle {
    /// Font size in points
    pub font_size: u32,
    pub position: SubtitlePosition,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font_size: 18,
            position: SubtitlePosition::Bottom,
        }
    }
}

/// Visual theme framing the content in simulated window chrome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSpec {
    /// Background color behind the window, hex without '#'
    pub background: String,
    /// Title bar color, hex without '#'
    pub bar_color: String,
    /// Draw the title bar with the three indicator dots
    pub title_bar: bool,
    /// Corner radius of the window in pixels
    pub corner_radius: u32,
    /// Fraction of each output dimension left as margin around the window
    pub padding: f64,
    /// Composite a blurred drop shadow beneath the window
    pub shadow: bool,
}

impl ThemeSpec {
    /// Look up a built-in theme by name.
    pub fn named(name: &str) -> DemoReelResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "midnight" => Ok(Self {
                background: "1e1e2e".to_string(),
                bar_color: "313244".to_string(),
                title_bar: true,
                corner_radius: 12,
                padding: 0.08,
                shadow: true,
            }),
            "paper" => Ok(Self {
                background: "f5f5f4".to_string(),
                bar_color: "e7e5e4".to_string(),
                title_bar: true,
                corner_radius: 10,
                padding: 0.06,
                shadow: true,
            }),
            "plain" => Ok(Self {
                background: "000000".to_string(),
                bar_color: "222222".to_string(),
                title_bar: false,
                corner_radius: 0,
                padding: 0.0,
                shadow: false,
            }),
            other => Err(DemoReelError::InvalidConfig {
                field: "theme".to_string(),
                message: format!("unknown theme '{}'", other),
            }),
        }
    }
}

/// Container/codec presets the orchestrator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// H.264 + AAC in MP4 with faststart
    Mp4,
    /// VP9 + Opus in WebM
    Webm,
}

impl OutputFormat {
    /// Parse a format tag as it appears in project files.
    pub fn parse(tag: &str) -> DemoReelResult<Self> {
        match tag.trim().to_lowercase().as_str() {
            "mp4" => Ok(OutputFormat::Mp4),
            "webm" => Ok(OutputFormat::Webm),
            other => Err(DemoReelError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Webm => "webm",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// One encoded output file. Created once per orchestrator invocation, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}
