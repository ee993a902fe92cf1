//! Track types for the timeline.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use snapcut_core::{RationalTime, Result, SnapcutError};
use tracing::debug;
use uuid::Uuid;

use crate::clip::Clip;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
    Text,
    Overlay,
}

impl TrackKind {
    /// Whether the compositor draws this track.
    pub fn is_visual(self) -> bool {
        !matches!(self, Self::Audio)
    }
}

/// Clips active at one instant; two during a transition.
pub type ActiveClips<'a> = SmallVec<[&'a Clip; 2]>;

/// A track holding time-ordered, non-overlapping clips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Clips sorted by start time
    clips: Vec<Clip>,
    /// Is track muted
    #[serde(default)]
    pub muted: bool,
    #[serde(default = "visible_default")]
    pub visible: bool,
    /// Is track locked (prevent edits)
    #[serde(default)]
    pub locked: bool,
    /// Stacking order; higher draws on top
    #[serde(default)]
    pub z_order: i32,
}

fn visible_default() -> bool {
    true
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            muted: false,
            visible: true,
            locked: false,
            z_order: 0,
        }
    }

    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Video)
    }

    /// Create a new audio track.
    pub fn new_audio(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Audio)
    }

    pub fn with_z_order(mut self, z_order: i32) -> Self {
        self.z_order = z_order;
        self
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// End of the last clip.
    pub fn end(&self) -> RationalTime {
        self.clips
            .iter()
            .map(Clip::end)
            .max()
            .unwrap_or(RationalTime::ZERO)
    }

    /// Find a clip by UUID.
    pub fn clip(&self, id: Uuid) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == id)
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(SnapcutError::Timeline(format!("track '{}' is locked", self.name)));
        }
        Ok(())
    }

    /// Insert a clip in time order. Rejects invalid clips and clips that
    /// overlap an existing one.
    pub fn add_clip(&mut self, clip: Clip) -> Result<()> {
        self.ensure_unlocked()?;
        clip.validate()?;
        if let Some(other) = self.clips.iter().find(|c| c.range().overlaps(clip.range())) {
            return Err(SnapcutError::Timeline(format!(
                "clip '{}' [{}, {}) overlaps '{}' on track '{}'",
                clip.name,
                clip.start,
                clip.end(),
                other.name,
                self.name
            )));
        }
        let index = self.clips.partition_point(|c| c.start < clip.start);
        debug!(track = %self.name, clip = %clip.id, index, "Added clip");
        self.clips.insert(index, clip);
        Ok(())
    }

    /// Remove a clip by UUID.
    pub fn remove_clip(&mut self, id: Uuid) -> Result<Clip> {
        self.ensure_unlocked()?;
        let index = self
            .clips
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| SnapcutError::Timeline(format!("no clip {id} on track '{}'", self.name)))?;
        Ok(self.clips.remove(index))
    }

    /// Enabled clips whose transition-widened window contains `t`, in
    /// timeline order. With `inclusive_end`, a clip whose window ends
    /// exactly at `t` also counts.
    pub fn active_clips(&self, t: RationalTime, inclusive_end: bool) -> ActiveClips<'_> {
        self.clips
            .iter()
            .filter(|c| c.enabled)
            .filter(|c| {
                let window = c.active_window();
                window.contains(t) || (inclusive_end && window.end() == t)
            })
            .collect()
    }

    /// Check ordering, overlap and every clip. Deserialized tracks bypass
    /// [`Track::add_clip`].
    pub fn validate(&self) -> Result<()> {
        for clip in &self.clips {
            clip.validate()?;
        }
        for pair in self.clips.windows(2) {
            if pair[1].start < pair[0].end() {
                return Err(SnapcutError::Timeline(format!(
                    "track '{}': clip '{}' starts before '{}' ends",
                    self.name, pair[1].name, pair[0].name
                )));
            }
        }
        Ok(())
    }
}
