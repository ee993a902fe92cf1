//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use snapcut_core::{KeyframeTrack, RationalTime, Result, SnapcutError, TimeRange, Vec2};
use snapcut_effects::{EffectInstance, TransitionKind};
use uuid::Uuid;

/// Names of keyframeable clip properties.
pub mod property {
    pub const OPACITY: &str = "opacity";
    /// Uniform scale; `scale_x`/`scale_y` override it per axis.
    pub const SCALE: &str = "scale";
    pub const SCALE_X: &str = "scale_x";
    pub const SCALE_Y: &str = "scale_y";
    /// Degrees.
    pub const ROTATION: &str = "rotation";
    pub const POSITION_X: &str = "position_x";
    pub const POSITION_Y: &str = "position_y";

    pub const ALL: [&str; 7] = [
        OPACITY, SCALE, SCALE_X, SCALE_Y, ROTATION, POSITION_X, POSITION_Y,
    ];
}

/// Reference to a media source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRef {
    /// Media identifier passed to the frame source
    pub media_id: String,
    /// Source duration
    pub source_duration: RationalTime,
}

impl ClipRef {
    /// Create a new clip reference.
    pub fn new(media_id: impl Into<String>, duration: RationalTime) -> Self {
        Self {
            media_id: media_id.into(),
            source_duration: duration,
        }
    }
}

/// Which edge of a clip a transition sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionEdge {
    /// Blends in from the previous clip; the clip starts early by the duration.
    Start,
    /// Blends out into the next clip; the clip runs late by the duration.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub kind: TransitionKind,
    pub duration: RationalTime,
    pub edge: TransitionEdge,
}

impl TransitionSpec {
    pub fn new(kind: TransitionKind, duration: RationalTime, edge: TransitionEdge) -> Self {
        Self {
            kind,
            duration,
            edge,
        }
    }
}

/// Placement of a clip on the canvas.
///
/// The clip's anchor point (normalized source coordinates) lands at the
/// canvas center offset by `position`, after scaling and rotation about the
/// anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipTransform {
    pub scale: Vec2,
    /// Degrees, clockwise in screen space.
    pub rotation: f32,
    /// Pixel offset from the canvas center.
    pub position: Vec2,
    pub anchor: Vec2,
    pub opacity: f32,
    /// Stacking order within the track.
    pub z_order: i32,
}

impl ClipTransform {
    pub const IDENTITY: Self = Self {
        scale: Vec2::ONE,
        rotation: 0.0,
        position: Vec2::ZERO,
        anchor: Vec2::new(0.5, 0.5),
        opacity: 1.0,
        z_order: 0,
    };

    /// Whether the geometric part is the identity placement.
    pub fn is_identity_placement(&self) -> bool {
        self.scale == Vec2::ONE
            && self.rotation == 0.0
            && self.position == Vec2::ZERO
            && self.anchor == Vec2::new(0.5, 0.5)
    }
}

impl Default for ClipTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: Uuid,
    /// Clip name
    pub name: String,
    /// Reference to source media
    pub source: ClipRef,
    /// Timeline start
    pub start: RationalTime,
    /// Duration on timeline
    pub duration: RationalTime,
    /// Source in point
    pub source_in: RationalTime,
    /// Playback speed (1.0 = normal)
    pub speed: f64,
    /// Is clip enabled
    pub enabled: bool,
    #[serde(default)]
    pub transform: ClipTransform,
    /// Effect chain in application order
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
    #[serde(default)]
    pub transitions: SmallVec<[TransitionSpec; 2]>,
    /// Animated properties, one track per property name
    #[serde(default)]
    pub keyframes: Vec<KeyframeTrack>,
}

impl Clip {
    /// Create a new clip at time zero covering the whole source.
    pub fn new(name: impl Into<String>, source: ClipRef) -> Self {
        let duration = source.source_duration;
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source,
            start: RationalTime::ZERO,
            duration,
            source_in: RationalTime::ZERO,
            speed: 1.0,
            enabled: true,
            transform: ClipTransform::IDENTITY,
            effects: Vec::new(),
            transitions: SmallVec::new(),
            keyframes: Vec::new(),
        }
    }

    pub fn at(mut self, start: RationalTime) -> Self {
        self.start = start;
        self
    }

    /// Set the source in point and timeline duration.
    pub fn trimmed(mut self, source_in: RationalTime, duration: RationalTime) -> Self {
        self.source_in = source_in;
        self.duration = duration;
        self
    }

    pub fn with_effect(mut self, effect: EffectInstance) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a transition, replacing any existing one on the same edge.
    pub fn with_transition(mut self, spec: TransitionSpec) -> Self {
        self.transitions.retain(|t| t.edge != spec.edge);
        self.transitions.push(spec);
        self
    }

    /// Add or replace the keyframe track for `track.name`.
    pub fn with_keyframes(mut self, track: KeyframeTrack) -> Self {
        self.keyframes.retain(|k| k.name != track.name);
        self.keyframes.push(track);
        self
    }

    pub fn with_transform(mut self, transform: ClipTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Timeline end (exclusive).
    pub fn end(&self) -> RationalTime {
        self.start + self.duration
    }

    /// Timeline range.
    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start, self.duration)
    }

    /// Length of source media consumed at the clip's speed.
    pub fn source_span(&self) -> RationalTime {
        if self.speed == 1.0 {
            self.duration
        } else {
            RationalTime::from_seconds_f64(self.duration.to_seconds_f64() * self.speed)
        }
    }

    /// Get the source out point.
    pub fn source_out(&self) -> RationalTime {
        self.source_in + self.source_span()
    }

    /// Get the source time range.
    pub fn source_range(&self) -> TimeRange {
        TimeRange::new(self.source_in, self.source_span())
    }

    pub fn transition(&self, edge: TransitionEdge) -> Option<&TransitionSpec> {
        self.transitions.iter().find(|t| t.edge == edge)
    }

    /// Timeline range widened by edge transitions.
    pub fn active_window(&self) -> TimeRange {
        let lead = self
            .transition(TransitionEdge::Start)
            .map_or(RationalTime::ZERO, |t| t.duration);
        let tail = self
            .transition(TransitionEdge::End)
            .map_or(RationalTime::ZERO, |t| t.duration);
        TimeRange::from_start_end(self.start - lead, self.end() + tail)
    }

    /// Source media time in microseconds for timeline time `t`.
    ///
    /// Pre- and post-roll read handle media outside the trim window and
    /// freeze on the first or last source frame past the media bounds.
    pub fn local_media_time(&self, t: RationalTime) -> i64 {
        let offset = t - self.start;
        let scaled = if self.speed == 1.0 {
            offset
        } else {
            RationalTime::from_seconds_f64(offset.to_seconds_f64() * self.speed)
        };
        let last = (self.source.source_duration.to_micros() - 1).max(0);
        (self.source_in + scaled).to_micros().clamp(0, last)
    }

    /// Keyframe track for a property, if animated.
    pub fn keyframe_track(&self, name: &str) -> Option<&KeyframeTrack> {
        self.keyframes
            .iter()
            .find(|k| k.name == name && !k.is_empty())
    }

    /// Transform at timeline time `t` with keyframed properties applied.
    pub fn transform_at(&self, t: RationalTime) -> ClipTransform {
        let local = (t - self.start).to_seconds_f64();
        let value = |name: &str| self.keyframe_track(name).map(|k| k.evaluate(local) as f32);
        let mut out = self.transform;
        if let Some(v) = value(property::OPACITY) {
            out.opacity = v;
        }
        if let Some(v) = value(property::SCALE) {
            out.scale = Vec2::splat(v);
        }
        if let Some(v) = value(property::SCALE_X) {
            out.scale.x = v;
        }
        if let Some(v) = value(property::SCALE_Y) {
            out.scale.y = v;
        }
        if let Some(v) = value(property::ROTATION) {
            out.rotation = v;
        }
        if let Some(v) = value(property::POSITION_X) {
            out.position.x = v;
        }
        if let Some(v) = value(property::POSITION_Y) {
            out.position.y = v;
        }
        out.opacity = out.opacity.clamp(0.0, 1.0);
        out
    }

    /// Check the trim window, duration, speed and transitions.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(SnapcutError::Timeline(format!("clip '{}': {msg}", self.name)));
        if self.duration <= RationalTime::ZERO {
            return fail(format!("non-positive duration {}", self.duration));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return fail(format!("invalid speed {}", self.speed));
        }
        if self.source_in.is_negative() {
            return fail(format!("negative source in {}", self.source_in));
        }
        if self.source_out() > self.source.source_duration {
            return fail(format!(
                "trim window ends at {} past source duration {}",
                self.source_out(),
                self.source.source_duration
            ));
        }
        if let Some(t) = self.transitions.iter().find(|t| t.duration.is_negative()) {
            return fail(format!("negative {:?} transition duration", t.edge));
        }
        for track in &self.keyframes {
            if !property::ALL.contains(&track.name.as_str()) {
                return fail(format!("unknown keyframed property '{}'", track.name));
            }
        }
        Ok(())
    }
}
