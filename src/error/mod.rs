//! Error handling module for demoreel

use thiserror::Error;

/// How an upstream (probe, AI service) failure should be treated by callers.
///
/// The planning code never retries on its own; retry policy belongs to the
/// caller, which needs to know whether retrying can possibly help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamKind {
    /// Network-ish failure that may succeed on retry
    Transient,
    /// Malformed input or missing capability; retrying cannot help
    Permanent,
}

/// Main error type for demoreel operations
#[derive(Error, Debug)]
pub enum DemoReelError {
    /// Configuration rejected before any graph construction
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    /// Transition style name outside the supported set
    #[error("Unknown transition style: {name}")]
    UnknownTransition { name: String },

    /// Transition duration outside the 0.1-5.0s range
    #[error("Transition duration {duration}s out of range (0.1-5.0s)")]
    TransitionDurationOutOfRange { duration: f64 },

    /// Output format tag not recognized
    #[error("Unsupported output format: {format}. Expected mp4 or webm")]
    UnsupportedFormat { format: String },

    /// Recording file missing or unreadable
    #[error("Recording not found: {path}")]
    RecordingNotFound { path: String },

    /// Duration probe failure
    #[error("Failed to probe duration of {path}: {message}")]
    ProbeError {
        path: String,
        message: String,
        kind: UpstreamKind,
    },

    /// External encode command exited nonzero; stderr attached verbatim
    #[error("Encode failed for {format} output: {diagnostics}")]
    EncodeFailed { format: String, diagnostics: String },

    /// Filter graph assembly produced a duplicate stream label
    #[error("Filter graph label collision: {label}")]
    DuplicateLabel { label: String },

    /// Project file parse error
    #[error("Failed to parse project file {path}: {message}")]
    ProjectParseError { path: String, message: String },

    /// Caption file write error
    #[error("Failed to write caption file: {message}")]
    CaptionError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DemoReelError {
    /// Whether the failure is worth retrying from the caller's side.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DemoReelError::ProbeError {
                kind: UpstreamKind::Transient,
                ..
            }
        )
    }
}

/// Result type alias for demoreel operations
pub type DemoReelResult<T> = std::result::Result<T, DemoReelError>;
