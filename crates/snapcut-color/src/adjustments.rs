//! Grading parameter records.
//!
//! These are immutable value objects: an edit replaces the whole record.
//! Ranges are enforced by [`ColorGradingAdjustments::clamped`], which the
//! pipeline calls before building its operation list.

use serde::{Deserialize, Serialize};

use crate::curves::CurvesAdjustment;
use crate::film::FilmPreset;
use crate::lut::Lut3D;
use crate::transfer::LogFormat;

/// Lift/gamma/gain/hue/saturation for one tonal range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorWheel {
    /// Additive offset, [-1, 1].
    pub lift: f32,
    /// Power curve exponent denominator, [0.1, 10].
    pub gamma: f32,
    /// Multiplier, [0, 4].
    pub gain: f32,
    /// Hue rotation in degrees, [-180, 180].
    pub hue: f32,
    /// Saturation multiplier, [0, 4].
    pub saturation: f32,
}

impl ColorWheel {
    pub const NEUTRAL: Self = Self {
        lift: 0.0,
        gamma: 1.0,
        gain: 1.0,
        hue: 0.0,
        saturation: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::NEUTRAL
    }

    pub fn clamped(self) -> Self {
        Self {
            lift: clamp_finite(self.lift, -1.0, 1.0, 0.0),
            gamma: clamp_finite(self.gamma, 0.1, 10.0, 1.0),
            gain: clamp_finite(self.gain, 0.0, 4.0, 1.0),
            hue: clamp_finite(self.hue, -180.0, 180.0, 0.0),
            saturation: clamp_finite(self.saturation, 0.0, 4.0, 1.0),
        }
    }
}

impl Default for ColorWheel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Shadow, midtone and highlight wheels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorWheels {
    pub shadows: ColorWheel,
    pub midtones: ColorWheel,
    pub highlights: ColorWheel,
}

impl ColorWheels {
    pub fn is_identity(&self) -> bool {
        self.shadows.is_identity() && self.midtones.is_identity() && self.highlights.is_identity()
    }

    pub fn clamped(self) -> Self {
        Self {
            shadows: self.shadows.clamped(),
            midtones: self.midtones.clamped(),
            highlights: self.highlights.clamped(),
        }
    }
}

/// Hue shift, saturation and lightness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HslAdjustment {
    /// Degrees, applied modulo 360.
    pub hue_shift: f32,
    /// Multiplier, [0, 4].
    pub saturation: f32,
    /// Additive, [-1, 1].
    pub lightness: f32,
}

impl HslAdjustment {
    pub const NEUTRAL: Self = Self {
        hue_shift: 0.0,
        saturation: 1.0,
        lightness: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        self.hue_shift.rem_euclid(360.0) == 0.0 && self.saturation == 1.0 && self.lightness == 0.0
    }

    pub fn clamped(self) -> Self {
        Self {
            hue_shift: clamp_finite(self.hue_shift, f32::MIN, f32::MAX, 0.0).rem_euclid(360.0),
            saturation: clamp_finite(self.saturation, 0.0, 4.0, 1.0),
            lightness: clamp_finite(self.lightness, -1.0, 1.0, 0.0),
        }
    }
}

impl Default for HslAdjustment {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Temperature and tint, both in [-100, 100].
///
/// Positive temperature warms (red up, blue down); positive tint pushes
/// toward magenta (green down, red and blue up).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteBalance {
    pub temperature: f32,
    pub tint: f32,
}

impl WhiteBalance {
    pub fn is_identity(&self) -> bool {
        self.temperature == 0.0 && self.tint == 0.0
    }

    pub fn clamped(self) -> Self {
        Self {
            temperature: clamp_finite(self.temperature, -100.0, 100.0, 0.0),
            tint: clamp_finite(self.tint, -100.0, 100.0, 0.0),
        }
    }
}

/// Complete grading record for one clip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorGradingAdjustments {
    pub wheels: ColorWheels,
    pub curves: CurvesAdjustment,
    pub lut: Option<Lut3D>,
    pub hsl: HslAdjustment,
    pub white_balance: WhiteBalance,
    pub film: Option<FilmPreset>,
    /// Source encoding; when set the pixels are linearized first.
    pub log_format: Option<LogFormat>,
}

impl ColorGradingAdjustments {
    /// Whether grading with these settings is a no-op.
    pub fn is_identity(&self) -> bool {
        self.wheels.is_identity()
            && self.curves.is_identity()
            && self.lut.is_none()
            && self.hsl.is_identity()
            && self.white_balance.is_identity()
            && self.film.is_none()
            && self.log_format.is_none()
    }

    /// Copy with every numeric parameter forced into its documented range.
    /// Non-finite values fall back to neutral.
    pub fn clamped(&self) -> Self {
        Self {
            wheels: self.wheels.clamped(),
            curves: self.curves.clone(),
            lut: self.lut.clone(),
            hsl: self.hsl.clamped(),
            white_balance: self.white_balance.clamped(),
            film: self.film,
            log_format: self.log_format,
        }
    }
}

fn clamp_finite(v: f32, lo: f32, hi: f32, neutral: f32) -> f32 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        neutral
    }
}
