//! Error types for snapcut.

use thiserror::Error;

/// Main error type for snapcut operations.
#[derive(Error, Debug)]
pub enum SnapcutError {
    /// Malformed grading, keying, or transition parameters. Raised before
    /// any pixel loop runs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The frame source could not supply a frame for a clip.
    #[error("Decode unavailable for {media} at {time_us}us: {reason}")]
    DecodeUnavailable {
        media: String,
        time_us: i64,
        reason: String,
    },

    /// Output frame allocation failed.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SnapcutError {
    /// Whether this error only affects a single clip and the rest of the
    /// frame can still render.
    pub fn is_clip_local(&self) -> bool {
        matches!(self, Self::DecodeUnavailable { .. })
    }
}

/// Result type alias for snapcut operations.
pub type Result<T> = std::result::Result<T, SnapcutError>;
