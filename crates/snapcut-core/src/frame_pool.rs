//! Frame pool for reusing working buffers across renders.
//!
//! Frames dominate allocation cost in the render path. Instead of dropping
//! them after every render, callers check a frame out with [`FramePool::acquire`]
//! and hand it back with [`FramePool::release`]. Pooled frames are keyed by
//! resolution and bounded by a byte budget.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::color::Color;
use crate::error::Result;
use crate::frame::Frame;

/// Key for pooled frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FrameKey {
    width: u32,
    height: u32,
}

#[derive(Default)]
struct PoolState {
    /// Available (free) frames, keyed by dimensions.
    free: HashMap<FrameKey, Vec<Frame>>,
    /// Total memory held by pooled frames.
    total_memory: usize,
}

/// Pool of reusable frames. Safe to share between render threads.
pub struct FramePool {
    state: Mutex<PoolState>,
    /// Maximum memory budget for the pool.
    max_memory: usize,
}

impl FramePool {
    /// Create a new frame pool with the given memory budget in bytes.
    pub fn new(max_memory: usize) -> Self {
        Self {
            state: Mutex::new(PoolState::default()),
            max_memory,
        }
    }

    /// Check out a transparent frame, reusing a pooled one when available.
    pub fn acquire(&self, width: u32, height: u32) -> Result<Frame> {
        self.acquire_filled(width, height, Color::TRANSPARENT)
    }

    /// Check out a frame cleared to `color`.
    pub fn acquire_filled(&self, width: u32, height: u32, color: Color) -> Result<Frame> {
        let key = FrameKey { width, height };
        let pooled = {
            let mut state = self.state.lock();
            let frame = state.free.get_mut(&key).and_then(Vec::pop);
            if let Some(frame) = &frame {
                state.total_memory -= frame.memory_size();
            }
            frame
        };

        match pooled {
            Some(mut frame) => {
                frame.clear(color);
                Ok(frame)
            }
            None => {
                let mut frame = Frame::try_new(width, height)?;
                if color != Color::TRANSPARENT {
                    frame.clear(color);
                }
                Ok(frame)
            }
        }
    }

    /// Return a frame to the pool for reuse.
    pub fn release(&self, frame: Frame) {
        let mem = frame.memory_size();
        let mut state = self.state.lock();

        // If returning this frame would exceed budget, drop it instead
        if state.total_memory + mem > self.max_memory {
            tracing::trace!(
                width = frame.width(),
                height = frame.height(),
                pooled = state.total_memory,
                "frame pool over budget, dropping frame"
            );
            return;
        }

        let key = FrameKey {
            width: frame.width(),
            height: frame.height(),
        };
        state.total_memory += mem;
        state.free.entry(key).or_default().push(frame);
    }

    /// Total memory used by pooled (free) frames.
    pub fn memory_usage(&self) -> usize {
        self.state.lock().total_memory
    }

    /// Number of frames in the pool.
    pub fn frame_count(&self) -> usize {
        self.state.lock().free.values().map(Vec::len).sum()
    }

    /// Drop all pooled frames.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.free.clear();
        state.total_memory = 0;
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new(crate::memory_budget::FRAME_POOL_BUDGET)
    }
}
