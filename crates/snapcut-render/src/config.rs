//! Compositor configuration.

use serde::{Deserialize, Serialize};
use snapcut_core::{memory_budget, Color};

/// Configuration for the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Build per-track layers on the rayon pool.
    pub parallel_tracks: bool,
    /// Bytes of recycled output frames kept for reuse.
    pub pool_budget: usize,
    /// Output clear colour.
    pub background: Color,
    /// Render clips ending at the project duration when `t == duration`.
    pub include_timeline_end: bool,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            parallel_tracks: true,
            pool_budget: memory_budget::FRAME_POOL_BUDGET,
            background: Color::TRANSPARENT,
            include_timeline_end: true,
        }
    }
}
