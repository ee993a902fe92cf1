//! Frame source and sink collaborators.
//!
//! The compositor never decodes media itself. It asks a [`FrameSource`] for
//! the frame of a media id at a source time in microseconds and hands
//! finished frames to a [`FrameSink`].

use std::collections::HashMap;

use snapcut_core::{Frame, SnapcutError};
use thiserror::Error;

/// Why a frame source could not supply a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("unknown media '{0}'")]
    UnknownMedia(String),

    #[error("no frame at {0}us")]
    OutOfRange(i64),

    #[error("decoder failed: {0}")]
    Failed(String),
}

impl DecodeError {
    /// Attach the request that failed.
    pub fn at(self, media: &str, time_us: i64) -> SnapcutError {
        SnapcutError::DecodeUnavailable {
            media: media.to_string(),
            time_us,
            reason: self.to_string(),
        }
    }
}

/// Supplies decoded frames. Shared across render threads.
pub trait FrameSource: Send + Sync {
    fn get_frame(&self, media_id: &str, time_us: i64) -> Result<Frame, DecodeError>;
}

impl<F> FrameSource for F
where
    F: Fn(&str, i64) -> Result<Frame, DecodeError> + Send + Sync,
{
    fn get_frame(&self, media_id: &str, time_us: i64) -> Result<Frame, DecodeError> {
        self(media_id, time_us)
    }
}

/// Receives composited frames.
pub trait FrameSink {
    fn accept(&mut self, frame: Frame) -> snapcut_core::Result<()>;
}

impl FrameSink for Vec<Frame> {
    fn accept(&mut self, frame: Frame) -> snapcut_core::Result<()> {
        self.push(frame);
        Ok(())
    }
}

/// One still frame per media id, returned for every time.
#[derive(Debug, Clone, Default)]
pub struct StillSource {
    frames: HashMap<String, Frame>,
}

impl StillSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, media_id: impl Into<String>, frame: Frame) -> Self {
        self.insert(media_id, frame);
        self
    }

    pub fn insert(&mut self, media_id: impl Into<String>, frame: Frame) {
        self.frames.insert(media_id.into(), frame);
    }
}

impl FrameSource for StillSource {
    fn get_frame(&self, media_id: &str, time_us: i64) -> Result<Frame, DecodeError> {
        if time_us < 0 {
            return Err(DecodeError::OutOfRange(time_us));
        }
        self.frames
            .get(media_id)
            .cloned()
            .ok_or_else(|| DecodeError::UnknownMedia(media_id.to_string()))
    }
}
