//! Keyframe animation with easing.
//!
//! Samples are `(time, value)` pairs kept sorted and unique by time.
//! [`interpolate`] evaluates a sample list at any time: outside the sampled
//! span it holds the boundary value, inside it eases the progress between
//! the bracketing pair and interpolates linearly with the eased progress.
//! Insert and remove are pure and return a new list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SnapcutError;

// ── Easing curves ───────────────────────────────────────────────

/// Cubic Bézier control points for easing (x1, y1, x2, y2).
/// The curve goes from (0,0) to (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Evaluate the X coordinate of the Bézier curve at parameter t.
    fn sample_x(&self, t: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * t * self.x1 + 3.0 * mt * t * t * self.x2 + t * t * t
    }

    /// Evaluate the Y coordinate of the Bézier curve at parameter t.
    fn sample_y(&self, t: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * t * self.y1 + 3.0 * mt * t * t * self.y2 + t * t * t
    }

    /// Derivative of X with respect to t.
    fn sample_dx(&self, t: f64) -> f64 {
        let mt = 1.0 - t;
        3.0 * mt * mt * self.x1 + 6.0 * mt * t * (self.x2 - self.x1) + 3.0 * t * t * (1.0 - self.x2)
    }

    /// Solve for the parameter t given an x value using Newton-Raphson,
    /// falling back to bisection when the slope vanishes.
    /// Returns the y value at that x.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }

        let mut t = x;
        for _ in 0..8 {
            let err = self.sample_x(t) - x;
            if err.abs() < 1e-10 {
                return self.sample_y(t);
            }
            let dx = self.sample_dx(t);
            if dx.abs() < 1e-12 {
                break;
            }
            t = (t - err / dx).clamp(0.0, 1.0);
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..32 {
            let sx = self.sample_x(t);
            if (sx - x).abs() < 1e-10 {
                break;
            }
            if sx < x {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        self.sample_y(t)
    }

    // Common easing presets
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE: Self = Self::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: Self = Self::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: Self = Self::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: Self = Self::new(0.42, 0.0, 0.58, 1.0);
}

/// Remapping of linear progress between two keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Easing {
    /// No interpolation, hold the earlier value until the next keyframe.
    Hold,
    #[default]
    Linear,
    /// Quadratic ease-in.
    EaseIn,
    /// Quadratic ease-out.
    EaseOut,
    /// Quadratic ease-in-out.
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// Fixed cubic Bézier, the CSS `ease` curve.
    Bezier,
}

impl Easing {
    /// All easing kinds.
    pub const ALL: [Self; 9] = [
        Self::Hold,
        Self::Linear,
        Self::EaseIn,
        Self::EaseOut,
        Self::EaseInOut,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::Bezier,
    ];

    /// Remap linear progress `t` in [0, 1].
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Hold => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::Bezier => CubicBezier::EASE.evaluate(t),
        }
    }
}

// ── Keyframe ────────────────────────────────────────────────────

/// A single `(time, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Time of this keyframe, in seconds relative to the clip start.
    pub time: f64,
    /// Value at this keyframe.
    pub value: f64,
}

impl Keyframe {
    pub const fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Evaluate a sorted sample list at `time`.
///
/// Empty lists evaluate to 0, a single sample is constant, and times
/// outside the sampled span take the boundary value.
pub fn interpolate(samples: &[Keyframe], time: f64, easing: Easing) -> f64 {
    let (first, last) = match samples {
        [] => return 0.0,
        [only] => return only.value,
        [first, .., last] => (first, last),
    };
    if time <= first.time {
        return first.value;
    }
    if time >= last.time {
        return last.value;
    }

    let idx = samples
        .partition_point(|kf| kf.time <= time)
        .saturating_sub(1);
    let a = &samples[idx];
    let b = &samples[idx + 1];
    let span = b.time - a.time;
    if span <= 0.0 {
        return a.value;
    }
    let t = ((time - a.time) / span).clamp(0.0, 1.0);
    a.value + (b.value - a.value) * easing.apply(t)
}

/// Return a new sorted list with `key` inserted, replacing any sample at
/// the same time.
pub fn insert(samples: &[Keyframe], key: Keyframe) -> Vec<Keyframe> {
    let mut out = Vec::with_capacity(samples.len() + 1);
    let pos = samples.partition_point(|kf| kf.time < key.time);
    out.extend_from_slice(&samples[..pos]);
    out.push(key);
    let rest = &samples[pos..];
    match rest.first() {
        Some(kf) if kf.time == key.time => out.extend_from_slice(&rest[1..]),
        _ => out.extend_from_slice(rest),
    }
    out
}

/// Return a new list without the sample at `time`.
pub fn remove(samples: &[Keyframe], time: f64) -> Vec<Keyframe> {
    samples.iter().filter(|kf| kf.time != time).copied().collect()
}

// ── Keyframe track ──────────────────────────────────────────────

/// A named, animated scalar property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawKeyframeTrack")]
pub struct KeyframeTrack {
    /// Property name (e.g. `opacity`).
    pub name: String,
    /// Easing used between every pair of samples.
    pub easing: Easing,
    /// Sorted, unique-by-time samples.
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    /// Create a new empty keyframe track.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            easing: Easing::Linear,
            keyframes: Vec::new(),
        }
    }

    /// Create a track from arbitrary samples; they are sorted and
    /// de-duplicated (the last sample for a given time wins).
    pub fn from_samples(
        name: impl Into<String>,
        samples: impl IntoIterator<Item = Keyframe>,
        easing: Easing,
    ) -> Self {
        let keyframes = samples
            .into_iter()
            .fold(Vec::new(), |acc, kf| insert(&acc, kf));
        Self {
            name: name.into(),
            easing,
            keyframes,
        }
    }

    /// Builder-style insert.
    pub fn with_key(mut self, time: f64, value: f64) -> Self {
        self.keyframes = insert(&self.keyframes, Keyframe::new(time, value));
        self
    }

    /// Evaluate the track at a given time.
    pub fn evaluate(&self, time: f64) -> f64 {
        interpolate(&self.keyframes, time, self.easing)
    }

    /// Get all keyframes (read-only).
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Whether this track is animated (has more than one keyframe).
    pub fn is_animated(&self) -> bool {
        self.keyframes.len() > 1
    }
}

/// Wire form of a track, checked before it becomes a [`KeyframeTrack`].
#[derive(Deserialize)]
struct RawKeyframeTrack {
    name: String,
    #[serde(default)]
    easing: Easing,
    #[serde(default)]
    keyframes: Vec<Keyframe>,
}

impl TryFrom<RawKeyframeTrack> for KeyframeTrack {
    type Error = SnapcutError;

    fn try_from(raw: RawKeyframeTrack) -> Result<Self, Self::Error> {
        if let Some(kf) = raw.keyframes.iter().find(|kf| !kf.time.is_finite()) {
            return Err(SnapcutError::InvalidParameter(format!(
                "keyframe track '{}' has a non-finite time {}",
                raw.name, kf.time
            )));
        }
        if let Some(pair) = raw.keyframes.windows(2).find(|w| w[0].time >= w[1].time) {
            return Err(SnapcutError::InvalidParameter(format!(
                "keyframe track '{}' is not strictly ascending at {} -> {}",
                raw.name, pair[0].time, pair[1].time
            )));
        }
        Ok(Self {
            name: raw.name,
            easing: raw.easing,
            keyframes: raw.keyframes,
        })
    }
}

impl fmt::Display for KeyframeTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KeyframeTrack({}, {} keyframes)",
            self.name,
            self.keyframes.len()
        )
    }
}

// ── Tests ───────────────────────────────────────────────────────
