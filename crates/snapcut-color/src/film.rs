//! Film stock emulation.
//!
//! Each preset is a gamma bias, per-channel multipliers and a saturation
//! tweak. The preset is baked into a 33³ table once and applied as a LUT.

use serde::{Deserialize, Serialize};
use snapcut_core::color::luma;

use crate::error::ColorError;
use crate::lut::Lut3D;

/// Lattice size used when baking a preset.
pub const FILM_LUT_SIZE: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilmPreset {
    Kodak2383,
    Fuji3513,
    KodakPortra400,
    BleachBypass,
    CrossProcess,
    Technicolor,
}

/// Parameters behind a preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmResponse {
    pub gamma: f32,
    pub multipliers: [f32; 3],
    pub saturation: f32,
}

impl FilmPreset {
    pub const ALL: [Self; 6] = [
        Self::Kodak2383,
        Self::Fuji3513,
        Self::KodakPortra400,
        Self::BleachBypass,
        Self::CrossProcess,
        Self::Technicolor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kodak2383 => "Kodak 2383",
            Self::Fuji3513 => "Fuji 3513",
            Self::KodakPortra400 => "Kodak Portra 400",
            Self::BleachBypass => "Bleach Bypass",
            Self::CrossProcess => "Cross Process",
            Self::Technicolor => "Technicolor",
        }
    }

    pub fn response(&self) -> FilmResponse {
        let (gamma, multipliers, saturation) = match self {
            Self::Kodak2383 => (1.10, [1.05, 1.00, 0.92], 1.10),
            Self::Fuji3513 => (1.05, [0.96, 1.02, 1.04], 1.05),
            Self::KodakPortra400 => (0.95, [1.04, 1.00, 0.95], 0.90),
            Self::BleachBypass => (1.15, [1.00, 1.00, 1.00], 0.40),
            Self::CrossProcess => (1.00, [0.90, 1.08, 0.85], 1.25),
            Self::Technicolor => (1.05, [1.08, 0.98, 1.02], 1.35),
        };
        FilmResponse {
            gamma,
            multipliers,
            saturation,
        }
    }

    /// The analytic transform the baked table approximates.
    pub fn transform(&self, rgb: [f32; 3]) -> [f32; 3] {
        let resp = self.response();
        let mut c = [0.0f32; 3];
        for i in 0..3 {
            c[i] = rgb[i].clamp(0.0, 1.0).powf(resp.gamma) * resp.multipliers[i];
        }
        let l = luma(c);
        c.map(|v| (l + (v - l) * resp.saturation).clamp(0.0, 1.0))
    }

    pub fn bake(&self) -> Result<Lut3D, ColorError> {
        Lut3D::from_fn(FILM_LUT_SIZE, |rgb| self.transform(rgb))
    }
}
