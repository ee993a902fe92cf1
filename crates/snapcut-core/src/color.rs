//! Normalized RGBA color.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Rec. 601 luma weights, used by grading and keying.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// RGBA color with 32-bit float components in [0, 1], straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA components.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from RGB with alpha = 1.0.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from 8-bit RGBA values.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Convert to 8-bit RGBA, rounding to nearest.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// RGB components as an array.
    #[inline]
    pub fn to_rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Replace the RGB components, keeping alpha.
    #[inline]
    pub fn with_rgb(self, rgb: [f32; 3]) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            a: self.a,
        }
    }

    /// Replace alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Rec. 601 luma.
    #[inline]
    pub fn luma(self) -> f32 {
        luma(self.to_rgb())
    }

    /// Linear interpolation between two colors.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Straight-alpha "over": `self` composited on top of `dst`.
    #[inline]
    pub fn over(self, dst: Self) -> Self {
        let sa = self.a;
        if sa >= 1.0 {
            return self;
        }
        if sa <= 0.0 {
            return dst;
        }
        let da = dst.a * (1.0 - sa);
        let a = sa + da;
        if a <= 0.0 {
            return Self::TRANSPARENT;
        }
        Self {
            r: (self.r * sa + dst.r * da) / a,
            g: (self.g * sa + dst.g * da) / a,
            b: (self.b * sa + dst.b * da) / a,
            a,
        }
    }

    /// Scale rgb by alpha.
    #[inline]
    pub fn premultiplied(self) -> Self {
        Self {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    /// Inverse of [`Color::premultiplied`]. Zero alpha yields transparent black.
    #[inline]
    pub fn unpremultiplied(self) -> Self {
        if self.a <= 0.0 {
            return Self::TRANSPARENT;
        }
        Self {
            r: self.r / self.a,
            g: self.g / self.a,
            b: self.b / self.a,
            a: self.a,
        }
    }

    /// Clamp every component to [0, 1].
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
            a: self.a.clamp(0.0, 1.0),
        }
    }

    // Common colors
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
}

/// Rec. 601 luma of an RGB triple.
#[inline]
pub fn luma(rgb: [f32; 3]) -> f32 {
    LUMA_WEIGHTS[0] * rgb[0] + LUMA_WEIGHTS[1] * rgb[1] + LUMA_WEIGHTS[2] * rgb[2]
}

#[inline]
fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
