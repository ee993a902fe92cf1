//! Snapcut Render - Frame compositor
//!
//! Renders one output frame of a project at a timeline instant:
//! - Frame source and sink collaborators
//! - Per-clip layers (placement, effect chain, opacity)
//! - Transition blending between neighbouring clips
//! - Back-to-front straight-alpha compositing

pub mod compositor;
pub mod config;
pub mod source;
pub mod transform;

pub use compositor::{Compositor, RenderOutput};
pub use config::CompositorConfig;
pub use source::{DecodeError, FrameSink, FrameSource, StillSource};
pub use transform::{layer_transform, place};
