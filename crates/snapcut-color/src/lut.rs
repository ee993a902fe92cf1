//! 3D look-up tables.
//!
//! Data is a flat array of `size³` RGB triples with blue as the outer
//! axis, then green, red innermost. This matches the `.cube` row order.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::error::ColorError;

/// Lattice sizes accepted for a [`Lut3D`].
pub const SUPPORTED_SIZES: [usize; 3] = [17, 33, 65];

/// 3D Look-Up Table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLut")]
pub struct Lut3D {
    size: usize,
    data: Vec<f32>,
}

#[derive(Deserialize)]
struct RawLut {
    size: usize,
    data: Vec<f32>,
}

impl TryFrom<RawLut> for Lut3D {
    type Error = ColorError;

    fn try_from(raw: RawLut) -> Result<Self, Self::Error> {
        Self::new(raw.size, raw.data)
    }
}

impl Lut3D {
    /// Wrap a flat RGB array. Rejects unsupported sizes and a data length
    /// other than `size³·3`.
    pub fn new(size: usize, data: Vec<f32>) -> Result<Self, ColorError> {
        let lut = Self { size, data };
        lut.validate()?;
        Ok(lut)
    }

    /// Alias of [`Lut3D::new`] for flat-array import.
    pub fn from_flat(size: usize, data: Vec<f32>) -> Result<Self, ColorError> {
        Self::new(size, data)
    }

    /// Check size and data length.
    pub fn validate(&self) -> Result<(), ColorError> {
        if !SUPPORTED_SIZES.contains(&self.size) {
            return Err(ColorError::InvalidLut(format!(
                "unsupported size {} (expected one of {:?})",
                self.size, SUPPORTED_SIZES
            )));
        }
        let expected = self.size * self.size * self.size * 3;
        if self.data.len() != expected {
            return Err(ColorError::DimensionMismatch {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    /// Build a table by sampling `f` at every lattice point.
    pub fn from_fn<F>(size: usize, f: F) -> Result<Self, ColorError>
    where
        F: Fn([f32; 3]) -> [f32; 3],
    {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(ColorError::InvalidLut(format!("unsupported size {size}")));
        }
        let n = (size - 1) as f32;
        let mut data = Vec::with_capacity(size * size * size * 3);
        for b in 0..size {
            for g in 0..size {
                for r in 0..size {
                    let out = f([r as f32 / n, g as f32 / n, b as f32 / n]);
                    data.extend_from_slice(&out);
                }
            }
        }
        Ok(Self { size, data })
    }

    /// Identity table of the given size.
    pub fn identity(size: usize) -> Result<Self, ColorError> {
        Self::from_fn(size, |rgb| rgb)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Flat RGB data, b-outer, g, r-inner.
    pub fn to_flat(&self) -> Vec<f32> {
        self.data.clone()
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn at(&self, r: usize, g: usize, b: usize) -> [f32; 3] {
        let i = ((b * self.size + g) * self.size + r) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Apply the 3D LUT to an RGB triplet using trilinear interpolation.
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let s = self.size;
        let n = (s - 1) as f32;

        let coords = rgb.map(|v| v.clamp(0.0, 1.0) * n);

        let r0 = (coords[0] as usize).min(s - 2);
        let g0 = (coords[1] as usize).min(s - 2);
        let b0 = (coords[2] as usize).min(s - 2);
        let r1 = r0 + 1;
        let g1 = g0 + 1;
        let b1 = b0 + 1;
        let fr = coords[0] - r0 as f32;
        let fg = coords[1] - g0 as f32;
        let fb = coords[2] - b0 as f32;

        let c000 = self.at(r0, g0, b0);
        let c100 = self.at(r1, g0, b0);
        let c010 = self.at(r0, g1, b0);
        let c110 = self.at(r1, g1, b0);
        let c001 = self.at(r0, g0, b1);
        let c101 = self.at(r1, g0, b1);
        let c011 = self.at(r0, g1, b1);
        let c111 = self.at(r1, g1, b1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            let c00 = c000[c] * (1.0 - fr) + c100[c] * fr;
            let c10 = c010[c] * (1.0 - fr) + c110[c] * fr;
            let c01 = c001[c] * (1.0 - fr) + c101[c] * fr;
            let c11 = c011[c] * (1.0 - fr) + c111[c] * fr;
            let c0 = c00 * (1.0 - fg) + c10 * fg;
            let c1 = c01 * (1.0 - fg) + c11 * fg;
            out[c] = c0 * (1.0 - fb) + c1 * fb;
        }
        out
    }

    /// Parse a `.cube` file containing a 3D LUT.
    pub fn from_cube(content: &str) -> Result<Self, ColorError> {
        let mut size = 0usize;
        let mut data = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("TITLE") {
                continue;
            }
            if let Some(rest) = line.strip_prefix("LUT_3D_SIZE") {
                size = rest
                    .trim()
                    .parse()
                    .map_err(|e| ColorError::Parse(format!("bad LUT_3D_SIZE: {}", e)))?;
                continue;
            }
            if line.starts_with("LUT_1D_SIZE") {
                return Err(ColorError::InvalidLut("expected 3D LUT, got 1D".into()));
            }
            if line.starts_with("DOMAIN_MIN") || line.starts_with("DOMAIN_MAX") {
                // Only the unit domain is supported.
                let vals: Vec<f32> = line
                    .split_whitespace()
                    .skip(1)
                    .filter_map(|s| s.parse().ok())
                    .collect();
                let unit = if line.starts_with("DOMAIN_MIN") { 0.0 } else { 1.0 };
                if vals.iter().any(|v| *v != unit) {
                    return Err(ColorError::InvalidLut(format!("unsupported domain: {line}")));
                }
                continue;
            }

            let vals = line
                .split_whitespace()
                .map(|s| s.parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ColorError::Parse(format!("bad data row {line:?}: {e}")))?;
            if vals.len() != 3 {
                return Err(ColorError::Parse(format!("expected 3 values, got {line:?}")));
            }
            data.extend_from_slice(&vals);
        }

        if size == 0 {
            return Err(ColorError::InvalidLut("missing LUT_3D_SIZE".into()));
        }
        Self::new(size, data)
    }

    /// Write the table as `.cube` text.
    pub fn to_cube(&self, title: &str) -> String {
        let mut out = String::with_capacity(self.data.len() * 10 + 64);
        let _ = writeln!(out, "TITLE \"{title}\"");
        let _ = writeln!(out, "LUT_3D_SIZE {}", self.size);
        for rgb in self.data.chunks_exact(3) {
            let _ = writeln!(out, "{:.6} {:.6} {:.6}", rgb[0], rgb[1], rgb[2]);
        }
        out
    }
}
