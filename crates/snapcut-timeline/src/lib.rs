//! Snapcut Timeline - Timeline data model
//!
//! Immutable snapshots the compositor renders from:
//! - Projects containing tracks
//! - Tracks holding time-ordered, non-overlapping clips
//! - Clips with transforms, effect chains, transitions and keyframes
//! - Versioned JSON snapshots with schema migration

pub mod clip;
pub mod project;
pub mod serialization;
pub mod track;

pub use clip::{property, Clip, ClipRef, ClipTransform, TransitionEdge, TransitionSpec};
pub use project::Project;
pub use serialization::{ProjectFile, CURRENT_VERSION};
pub use track::{ActiveClips, Track, TrackKind};
