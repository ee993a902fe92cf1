//! Project type.

use serde::{Deserialize, Serialize};
use snapcut_core::{FrameRate, RationalTime, Result, SnapcutError, TimeRange};
use uuid::Uuid;

use crate::track::Track;

/// A project: tracks rendered at one resolution and frame rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,
    /// Project name
    pub name: String,
    /// Resolution width
    pub width: u32,
    /// Resolution height
    pub height: u32,
    /// Frame rate
    pub frame_rate: FrameRate,
    /// Tracks in authoring order
    pub tracks: Vec<Track>,
}

impl Project {
    /// Create a new project.
    pub fn new(name: impl Into<String>, width: u32, height: u32, frame_rate: FrameRate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            width,
            height,
            frame_rate,
            tracks: Vec::new(),
        }
    }

    /// Add a track, returning its index.
    pub fn add_track(&mut self, track: Track) -> usize {
        self.tracks.push(track);
        self.tracks.len() - 1
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn track_mut(&mut self, index: usize) -> Option<&mut Track> {
        self.tracks.get_mut(index)
    }

    /// Maximum clip end across all tracks.
    pub fn duration(&self) -> RationalTime {
        self.tracks
            .iter()
            .map(Track::end)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(RationalTime::ZERO, self.duration())
    }

    /// Number of frames needed to cover the duration at the project rate.
    pub fn frame_count(&self) -> i64 {
        let duration = self.duration();
        let whole = duration.to_frames(self.frame_rate);
        if RationalTime::from_frames(whole, self.frame_rate) < duration {
            whole + 1
        } else {
            whole
        }
    }

    /// Timeline position of frame `index`.
    pub fn frame_time(&self, index: i64) -> RationalTime {
        RationalTime::from_frames(index, self.frame_rate)
    }

    /// No clips on any track.
    pub fn is_empty(&self) -> bool {
        self.tracks.iter().all(Track::is_empty)
    }

    /// Indices of visible visual tracks, bottom to top by z-order. Ties
    /// keep authoring order.
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.tracks.len())
            .filter(|&i| self.tracks[i].visible && self.tracks[i].kind.is_visual())
            .collect();
        order.sort_by_key(|&i| self.tracks[i].z_order);
        order
    }

    /// Check resolution and every track.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapcutError::Timeline(format!(
                "invalid resolution {}x{}",
                self.width, self.height
            )));
        }
        if self.frame_rate.numerator == 0 || self.frame_rate.denominator == 0 {
            return Err(SnapcutError::Timeline(format!(
                "invalid frame rate {}",
                self.frame_rate
            )));
        }
        for track in &self.tracks {
            track.validate()?;
        }
        Ok(())
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new("Untitled Project", 1920, 1080, FrameRate::FPS_24)
    }
}
