//! Chroma keying (green/blue screen) with matte processing.
//!
//! Keying computes a per-pixel alpha, optionally blurs it, and removes key
//! color spill from the foreground. All operations read one frame and
//! return a new one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use snapcut_core::color::luma;
use snapcut_core::{Color, Frame, Result, SnapcutError};

/// Largest edge blur radius, in pixels.
pub const MAX_EDGE_BLUR: u32 = 32;

/// Light wrap sampling radius, in pixels.
const LIGHT_WRAP_RADIUS: u32 = 6;

/// Alpha below which a pixel is considered background for despill.
const DESPILL_ALPHA_MIN: f32 = 0.1;

/// Gain applied to the 8-neighbor variance in advanced edge mode.
const VARIANCE_GAIN: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    /// Euclidean RGB distance from the key color.
    ColorDistance,
    /// Dominant key channel minus the strongest other channel.
    #[default]
    ColorDifference,
    /// Distance in hue/saturation space.
    HslKey,
    /// Luminance threshold only; the key color is ignored.
    LumaKey,
    /// Color difference softened by local color variance.
    AdvancedEdge,
}

impl KeyAlgorithm {
    pub fn needs_key_color(&self) -> bool {
        matches!(self, Self::ColorDistance | Self::HslKey)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenType {
    #[default]
    Green,
    Blue,
    /// Dominant channel taken from the key color.
    Custom,
}

/// Parameters for chroma key extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromaKeySettings {
    /// Key color in RGB; required by color distance, HSL key and custom screens.
    pub key_color: Option<[f32; 3]>,
    pub algorithm: KeyAlgorithm,
    /// Key strength (0.0-1.0)
    pub threshold: f32,
    /// Transition width (0.0-1.0)
    pub tolerance: f32,
    /// Extra edge width (0.0-1.0)
    pub softness: f32,
    /// Spill suppression strength (0.0-1.0)
    pub spill_suppression: f32,
    /// Alpha box blur radius in pixels
    pub edge_blur: u32,
    /// Light wrap intensity (0.0-1.0)
    pub light_wrap: f32,
    pub despill: bool,
    pub screen: ScreenType,
}

impl Default for ChromaKeySettings {
    fn default() -> Self {
        Self {
            key_color: None,
            algorithm: KeyAlgorithm::ColorDifference,
            threshold: 0.2,
            tolerance: 0.3,
            softness: 0.1,
            spill_suppression: 0.5,
            edge_blur: 0,
            light_wrap: 0.0,
            despill: true,
            screen: ScreenType::Green,
        }
    }
}

impl ChromaKeySettings {
    /// Green screen default.
    pub fn green_screen() -> Self {
        Self::default()
    }

    /// Blue screen default.
    pub fn blue_screen() -> Self {
        Self {
            screen: ScreenType::Blue,
            ..Self::default()
        }
    }

    /// Copy with every parameter forced into range.
    pub fn clamped(&self) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            key_color: self.key_color.map(|c| c.map(unit)),
            threshold: unit(self.threshold),
            tolerance: unit(self.tolerance),
            softness: unit(self.softness),
            spill_suppression: unit(self.spill_suppression),
            edge_blur: self.edge_blur.min(MAX_EDGE_BLUR),
            light_wrap: unit(self.light_wrap),
            ..self.clone()
        }
    }
}

/// A validated keyer, ready to process frames.
#[derive(Debug, Clone)]
pub struct ChromaKeyer {
    settings: ChromaKeySettings,
    key: [f32; 3],
    dominant: usize,
    key_hs: [f32; 2],
}

impl ChromaKeyer {
    /// Validate settings. Algorithms and screens that need a key color fail
    /// with a configuration error when none is given.
    pub fn new(settings: &ChromaKeySettings) -> Result<Self> {
        let settings = settings.clamped();
        let needs_color =
            settings.algorithm.needs_key_color() || settings.screen == ScreenType::Custom;
        let key = match (settings.key_color, settings.screen) {
            (Some(color), _) => color,
            (None, _) if needs_color => {
                return Err(SnapcutError::Configuration(format!(
                    "{:?} keying on a {:?} screen requires a key color",
                    settings.algorithm, settings.screen
                )))
            }
            (None, ScreenType::Blue) => [0.0, 0.0, 1.0],
            (None, _) => [0.0, 1.0, 0.0],
        };
        let dominant = match settings.screen {
            ScreenType::Green => 1,
            ScreenType::Blue => 2,
            ScreenType::Custom => dominant_channel(key),
        };
        let key_hs = hue_sat(key);
        Ok(Self {
            settings,
            key,
            dominant,
            key_hs,
        })
    }

    pub fn settings(&self) -> &ChromaKeySettings {
        &self.settings
    }

    #[inline]
    fn edge(&self) -> f32 {
        (self.settings.tolerance + self.settings.softness).max(1e-4)
    }

    /// Key alpha for a single RGB value (1 = keep, 0 = keyed out).
    ///
    /// Advanced edge mode needs neighbors; for a lone pixel it matches
    /// color difference.
    pub fn compute_alpha(&self, rgb: [f32; 3]) -> f32 {
        let s = &self.settings;
        let edge = self.edge();
        match s.algorithm {
            KeyAlgorithm::ColorDistance => {
                let d = ((rgb[0] - self.key[0]).powi(2)
                    + (rgb[1] - self.key[1]).powi(2)
                    + (rgb[2] - self.key[2]).powi(2))
                .sqrt();
                smoothstep(s.threshold, s.threshold + edge, d)
            }
            KeyAlgorithm::ColorDifference | KeyAlgorithm::AdvancedEdge => {
                self.difference_alpha(rgb)
            }
            KeyAlgorithm::HslKey => {
                let [h, sat] = hue_sat(rgb);
                let dh = {
                    let d = (h - self.key_hs[0]).abs() % 360.0;
                    d.min(360.0 - d) / 180.0
                };
                let ds = sat - self.key_hs[1];
                let d = (dh * dh + ds * ds).sqrt();
                smoothstep(s.threshold, s.threshold + edge, d)
            }
            KeyAlgorithm::LumaKey => smoothstep(s.threshold, s.threshold + edge, luma(rgb)),
        }
    }

    fn difference_alpha(&self, rgb: [f32; 3]) -> f32 {
        let d = self.dominant;
        let others = (0..3)
            .filter(|&c| c != d)
            .map(|c| rgb[c])
            .fold(f32::MIN, f32::max);
        let diff = rgb[d] - others;
        let k = (diff / (1.0 - self.settings.threshold).max(1e-4)).clamp(0.0, 1.0);
        1.0 - smoothstep(0.0, self.edge(), k)
    }

    /// Key alpha for every pixel, edge blur applied.
    pub fn compute_matte(&self, frame: &Frame) -> Vec<f32> {
        let mut matte: Vec<f32> = frame
            .pixels()
            .par_iter()
            .map(|px| self.compute_alpha(px.to_rgb()))
            .collect();

        if self.settings.algorithm == KeyAlgorithm::AdvancedEdge {
            matte = self.soften_detail(frame, &matte);
        }
        if self.settings.edge_blur > 0 {
            matte = box_blur(
                &matte,
                frame.width(),
                frame.height(),
                self.settings.edge_blur,
            );
        }
        matte
    }

    /// Near detail (high 8-neighbor color variance) blend each alpha toward
    /// the neighborhood mean.
    fn soften_detail(&self, frame: &Frame, base: &[f32]) -> Vec<f32> {
        let w = frame.width() as i64;
        (0..base.len())
            .into_par_iter()
            .map(|i| {
                let x = i as i64 % w;
                let y = i as i64 / w;
                let center = frame.pixels()[i];
                let mut variance = 0.0;
                let mut alpha_sum = 0.0;
                let mut n = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let (nx, ny) = (x + dx, y + dy);
                        if let Some(px) = frame.get(nx, ny) {
                            variance += (px.r - center.r).powi(2)
                                + (px.g - center.g).powi(2)
                                + (px.b - center.b).powi(2);
                            alpha_sum += base[(ny * w + nx) as usize];
                            n += 1.0;
                        }
                    }
                }
                if n == 0.0 {
                    return base[i];
                }
                let v = (variance / n * VARIANCE_GAIN).min(1.0);
                base[i] * (1.0 - v) + (alpha_sum / n) * v
            })
            .collect()
    }

    /// Key a frame: multiply alpha by the matte, then suppress spill.
    pub fn apply(&self, frame: &Frame) -> Frame {
        let matte = self.compute_matte(frame);
        let despill = self.settings.despill && self.settings.spill_suppression > 0.0;
        let pixels = frame
            .pixels()
            .par_iter()
            .zip(matte.par_iter())
            .map(|(px, &m)| {
                let a = px.a * m;
                let mut out = px.with_alpha(a);
                if despill && a > DESPILL_ALPHA_MIN {
                    out = out.with_rgb(self.suppress_spill(out.to_rgb()));
                }
                out
            })
            .collect();
        Frame::from_pixels(frame.width(), frame.height(), pixels)
            .unwrap_or_else(|_| frame.clone())
    }

    /// Pull the dominant channel down to the strongest other channel.
    pub fn suppress_spill(&self, mut rgb: [f32; 3]) -> [f32; 3] {
        let d = self.dominant;
        let others = (0..3)
            .filter(|&c| c != d)
            .map(|c| rgb[c])
            .fold(f32::MIN, f32::max);
        let excess = (rgb[d] - others).max(0.0);
        rgb[d] -= excess * self.settings.spill_suppression;
        rgb
    }

    /// Grayscale preview of the matte (white = kept).
    pub fn matte(&self, frame: &Frame) -> Frame {
        let matte = self.compute_matte(frame);
        let pixels = matte
            .into_iter()
            .map(|m| Color::rgb(m, m, m))
            .collect();
        Frame::from_pixels(frame.width(), frame.height(), pixels)
            .unwrap_or_else(|_| Frame::new(frame.width(), frame.height()))
    }
}

/// Average RGB over a `size`×`size` square whose top-left is (x, y),
/// clipped to the frame. `None` when the square misses the frame.
pub fn detect_key_color(frame: &Frame, x: i64, y: i64, size: u32) -> Option<[f32; 3]> {
    let mut sum = [0.0f64; 3];
    let mut n = 0u64;
    for sy in y..y + size as i64 {
        for sx in x..x + size as i64 {
            if let Some(px) = frame.get(sx, sy) {
                sum[0] += px.r as f64;
                sum[1] += px.g as f64;
                sum[2] += px.b as f64;
                n += 1;
            }
        }
    }
    if n == 0 {
        return None;
    }
    Some(sum.map(|s| (s / n as f64) as f32))
}

/// Tint the edges of a keyed foreground with the blurred background.
pub fn light_wrap(keyed: &Frame, background: &Frame, amount: f32) -> Result<Frame> {
    if !keyed.same_size(background) {
        return Err(SnapcutError::Configuration(format!(
            "light wrap size mismatch: {}x{} vs {}x{}",
            keyed.width(),
            keyed.height(),
            background.width(),
            background.height()
        )));
    }
    let amount = amount.clamp(0.0, 1.0);
    if amount == 0.0 {
        return Ok(keyed.clone());
    }
    let (w, h) = (keyed.width(), keyed.height());
    let inverse: Vec<f32> = keyed.pixels().iter().map(|p| 1.0 - p.a).collect();
    let reach = box_blur(&inverse, w, h, LIGHT_WRAP_RADIUS);
    let planes: Vec<Vec<f32>> = (0..3)
        .map(|c| {
            let plane: Vec<f32> = background.pixels().iter().map(|p| p.to_rgb()[c]).collect();
            box_blur(&plane, w, h, LIGHT_WRAP_RADIUS)
        })
        .collect();

    let pixels = keyed
        .pixels()
        .iter()
        .enumerate()
        .map(|(i, px)| {
            if px.a <= 0.0 {
                return *px;
            }
            let t = (reach[i] * amount).clamp(0.0, 1.0);
            let bg = [planes[0][i], planes[1][i], planes[2][i]];
            let rgb = px.to_rgb();
            px.with_rgb([
                rgb[0] + (bg[0] - rgb[0]) * t,
                rgb[1] + (bg[1] - rgb[1]) * t,
                rgb[2] + (bg[2] - rgb[2]) * t,
            ])
        })
        .collect();
    Frame::from_pixels(w, h, pixels)
}

/// Separable box blur of a single plane, edges clamped.
pub fn box_blur(plane: &[f32], w: u32, h: u32, radius: u32) -> Vec<f32> {
    let (w, h, r) = (w as usize, h as usize, radius as i64);
    if radius == 0 || w == 0 || h == 0 || plane.len() != w * h {
        return plane.to_vec();
    }
    let norm = 1.0 / (2 * r + 1) as f32;

    let mut horizontal = vec![0.0f32; w * h];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let src = &plane[y * w..(y + 1) * w];
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for k in -r..=r {
                    let sx = (x as i64 + k).clamp(0, w as i64 - 1) as usize;
                    acc += src[sx];
                }
                *out = acc * norm;
            }
        });

    let mut out = vec![0.0f32; w * h];
    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        for (x, v) in row.iter_mut().enumerate() {
            let mut acc = 0.0;
            for k in -r..=r {
                let sy = (y as i64 + k).clamp(0, h as i64 - 1) as usize;
                acc += horizontal[sy * w + x];
            }
            *v = acc * norm;
        }
    });
    out
}

#[inline]
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0).max(1e-6)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn dominant_channel(rgb: [f32; 3]) -> usize {
    if rgb[1] >= rgb[0] && rgb[1] >= rgb[2] {
        1
    } else if rgb[2] >= rgb[0] {
        2
    } else {
        0
    }
}

/// Hue in degrees and HSV-style saturation.
fn hue_sat(rgb: [f32; 3]) -> [f32; 2] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    if d <= f32::EPSILON {
        return [0.0, 0.0];
    }
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    [h * 60.0, if max > 0.0 { d / max } else { 0.0 }]
}
