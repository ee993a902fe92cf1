//! Color subsystem errors.

use snapcut_core::SnapcutError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("invalid LUT: {0}")]
    InvalidLut(String),
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("invalid curve: {0}")]
    InvalidCurve(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<ColorError> for SnapcutError {
    fn from(e: ColorError) -> Self {
        SnapcutError::Configuration(e.to_string())
    }
}
