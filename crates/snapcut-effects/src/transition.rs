//! Transition blender.
//!
//! [`blend`] merges two equally sized frames at a progress in [0, 1].
//! Progress 0 returns `from` and progress 1 returns `to`, pixel for pixel,
//! for every kind.

use serde::{Deserialize, Serialize};
use snapcut_core::{Frame, Result, SnapcutError};

use crate::transitions::{circle, dissolve, slide, wipe, zoom};

/// Blend type between two clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransitionKind {
    #[default]
    Fade,
    Dissolve,
    /// `to` grows in from the right edge.
    WipeLeft,
    /// `to` grows in from the left edge.
    WipeRight,
    /// `to` grows in from the bottom edge.
    WipeUp,
    /// `to` grows in from the top edge.
    WipeDown,
    SlideLeft,
    SlideRight,
    ZoomIn,
    ZoomOut,
    CircleOpen,
    CircleClose,
}

impl TransitionKind {
    pub const ALL: [Self; 12] = [
        Self::Fade,
        Self::Dissolve,
        Self::WipeLeft,
        Self::WipeRight,
        Self::WipeUp,
        Self::WipeDown,
        Self::SlideLeft,
        Self::SlideRight,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::CircleOpen,
        Self::CircleClose,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fade => "Fade",
            Self::Dissolve => "Dissolve",
            Self::WipeLeft => "Wipe Left",
            Self::WipeRight => "Wipe Right",
            Self::WipeUp => "Wipe Up",
            Self::WipeDown => "Wipe Down",
            Self::SlideLeft => "Slide Left",
            Self::SlideRight => "Slide Right",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::CircleOpen => "Circle Open",
            Self::CircleClose => "Circle Close",
        }
    }
}

/// Blend `from` into `to`. Progress is clamped; a NaN progress counts as 0.
pub fn blend(from: &Frame, to: &Frame, kind: TransitionKind, progress: f32) -> Result<Frame> {
    if !from.same_size(to) {
        return Err(SnapcutError::Configuration(format!(
            "{} transition between {}x{} and {}x{} frames",
            kind.name(),
            from.width(),
            from.height(),
            to.width(),
            to.height()
        )));
    }
    let p = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    if p <= 0.0 {
        return Ok(from.clone());
    }
    if p >= 1.0 {
        return Ok(to.clone());
    }

    let out = match kind {
        TransitionKind::Fade | TransitionKind::Dissolve => dissolve::cross(from, to, p),
        TransitionKind::WipeLeft => wipe::wipe(from, to, p, wipe::Origin::Right),
        TransitionKind::WipeRight => wipe::wipe(from, to, p, wipe::Origin::Left),
        TransitionKind::WipeUp => wipe::wipe(from, to, p, wipe::Origin::Bottom),
        TransitionKind::WipeDown => wipe::wipe(from, to, p, wipe::Origin::Top),
        TransitionKind::SlideLeft => slide::slide(from, to, p, -1),
        TransitionKind::SlideRight => slide::slide(from, to, p, 1),
        TransitionKind::ZoomIn => zoom::zoom(from, to, p, p),
        TransitionKind::ZoomOut => zoom::zoom(from, to, p, 2.0 - p),
        TransitionKind::CircleOpen => circle::circle(from, to, p, circle::Iris::Open),
        TransitionKind::CircleClose => circle::circle(from, to, p, circle::Iris::Close),
    };
    Ok(out)
}
