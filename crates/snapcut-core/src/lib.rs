//! Snapcut Core - Foundation types for the compositing pipeline
//!
//! This crate provides the fundamental types used throughout snapcut:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - Normalized RGBA colors and float frame buffers
//! - An explicit-checkout frame pool
//! - Geometric primitives
//! - Keyframe interpolation with easing

pub mod color;
pub mod error;
pub mod frame;
pub mod frame_pool;
pub mod geometry;
pub mod keyframe;
pub mod time;

pub use color::Color;
pub use error::{Result, SnapcutError};
pub use frame::Frame;
pub use frame_pool::FramePool;
pub use geometry::{Rect, Transform2D, Vec2};
pub use keyframe::{interpolate, CubicBezier, Easing, Keyframe, KeyframeTrack};
pub use time::{FrameRate, RationalTime, TimeRange};

/// Memory budget constants for the render path.
pub mod memory_budget {
    /// Default budget for recycled frames held by a `FramePool`.
    pub const FRAME_POOL_BUDGET: usize = 512 * 1024 * 1024; // 512 MB
}
