//! RGB ↔ HSL conversion and the HSL adjustment.

use crate::adjustments::HslAdjustment;

/// Convert RGB in [0, 1] to (hue degrees, saturation, lightness).
pub fn rgb_to_hsl(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;
    if d <= f32::EPSILON {
        return [0.0, 0.0, l];
    }
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    [h * 60.0, s, l]
}

/// Convert (hue degrees, saturation, lightness) to RGB.
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [f32; 3] {
    let [h, s, l] = hsl;
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h.rem_euclid(360.0) / 360.0;
    [
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Shift hue, scale saturation and offset lightness.
pub fn apply_hsl(adj: &HslAdjustment, rgb: [f32; 3]) -> [f32; 3] {
    let [h, s, l] = rgb_to_hsl(rgb.map(|v| v.clamp(0.0, 1.0)));
    hsl_to_rgb([
        (h + adj.hue_shift).rem_euclid(360.0),
        (s * adj.saturation).clamp(0.0, 1.0),
        (l + adj.lightness).clamp(0.0, 1.0),
    ])
}
