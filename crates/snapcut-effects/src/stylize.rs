//! Simple stylize filters.
//!
//! All but old film are per-pixel. Old film adds a vignette and grain that
//! depend on position and on a per-frame seed, so the same seed always
//! reproduces the same frame.

use serde::{Deserialize, Serialize};
use snapcut_core::{Color, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Stylize {
    Grayscale,
    /// Sepia tone; `intensity` in [0, 1] blends from the original.
    Sepia { intensity: f32 },
    Invert,
    /// Sepia base with a corner vignette and luminance grain, both in
    /// [0, 1].
    OldFilm { grain: f32, vignette: f32 },
}

/// Peak grain offset at `grain == 1`.
const GRAIN_SCALE: f32 = 0.15;

fn unit(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        fallback
    }
}

fn sepia(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    [
        (0.393 * r + 0.769 * g + 0.189 * b).min(1.0),
        (0.349 * r + 0.686 * g + 0.168 * b).min(1.0),
        (0.272 * r + 0.534 * g + 0.131 * b).min(1.0),
    ]
}

/// Noise in [-1, 1] for a pixel and frame seed (splitmix64 finalizer).
fn grain_noise(seed: u64, x: u32, y: u32) -> f32 {
    let mut z = seed
        .wrapping_add((((y as u64) << 32) | x as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 40) as f32 / (1u64 << 23) as f32 - 1.0
}

impl Stylize {
    pub fn clamped(self) -> Self {
        match self {
            Self::Sepia { intensity } => Self::Sepia {
                intensity: unit(intensity, 1.0),
            },
            Self::OldFilm { grain, vignette } => Self::OldFilm {
                grain: unit(grain, 0.0),
                vignette: unit(vignette, 0.0),
            },
            other => other,
        }
    }

    /// Position-independent part of the filter. For old film that is the
    /// sepia base alone.
    #[inline]
    pub fn apply_pixel(&self, px: Color) -> Color {
        match *self {
            Self::Grayscale => {
                let l = px.luma();
                px.with_rgb([l, l, l])
            }
            Self::Sepia { intensity } => {
                let [r, g, b] = px.to_rgb();
                let sepia = sepia([r, g, b]);
                px.with_rgb([
                    r + (sepia[0] - r) * intensity,
                    g + (sepia[1] - g) * intensity,
                    b + (sepia[2] - b) * intensity,
                ])
            }
            Self::Invert => px.with_rgb([1.0 - px.r, 1.0 - px.g, 1.0 - px.b]),
            Self::OldFilm { .. } => px.with_rgb(sepia(px.to_rgb())),
        }
    }

    /// Filter a frame. `seed` only affects old film grain.
    pub fn apply(&self, frame: &Frame, seed: u64) -> Frame {
        match *self {
            Self::OldFilm { grain, vignette } => old_film(frame, grain, vignette, seed),
            _ => frame.map_pixels(|px| self.apply_pixel(px)),
        }
    }
}

fn old_film(frame: &Frame, grain: f32, vignette: f32, seed: u64) -> Frame {
    let (w, h) = (frame.width() as f32, frame.height() as f32);
    Frame::from_fn(frame.width(), frame.height(), |x, y| {
        let px = frame.pixel(x, y);
        let dx = (x as f32 + 0.5) / w - 0.5;
        let dy = (y as f32 + 0.5) / h - 0.5;
        // 0 at the center, 1 in the corners
        let edge = (dx * dx + dy * dy) * 2.0;
        let shade = 1.0 - vignette * edge;
        let noise = grain_noise(seed, x, y) * grain * GRAIN_SCALE;
        let rgb = sepia(px.to_rgb()).map(|c| (c * shade + noise).clamp(0.0, 1.0));
        px.with_rgb(rgb)
    })
}
