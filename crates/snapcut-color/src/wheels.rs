//! Three-way color wheels.
//!
//! Each pixel's Rec. 601 luma splits into shadow, midtone and highlight
//! weights that sum to one. The wheels are then applied in sequence, each
//! scaled by its weight.

use glam::{Mat3, Vec3};
use snapcut_core::color::luma;

use crate::adjustments::{ColorWheel, ColorWheels};

const SHADOW_END: f32 = 0.33;
const HIGHLIGHT_START: f32 = 0.66;

/// Weight of the shadow wheel at luma `l`.
#[inline]
pub fn shadow_weight(l: f32) -> f32 {
    (1.0 - l / SHADOW_END).max(0.0)
}

/// Weight of the highlight wheel at luma `l`.
#[inline]
pub fn highlight_weight(l: f32) -> f32 {
    ((l - HIGHLIGHT_START) / (1.0 - HIGHLIGHT_START)).max(0.0)
}

/// Weight of the midtone wheel at luma `l`.
#[inline]
pub fn midtone_weight(l: f32) -> f32 {
    (1.0 - shadow_weight(l) - highlight_weight(l)).clamp(0.0, 1.0)
}

/// Rotation about the neutral (1,1,1) axis.
pub(crate) fn hue_rotation(degrees: f32) -> Mat3 {
    Mat3::from_axis_angle(Vec3::ONE.normalize(), degrees.to_radians())
}

/// Apply all three wheels to one RGB triple.
pub fn apply_wheels(wheels: &ColorWheels, rgb: [f32; 3]) -> [f32; 3] {
    let l = luma(rgb);
    let mut c = Vec3::from_array(rgb);
    for (wheel, weight) in [
        (&wheels.shadows, shadow_weight(l)),
        (&wheels.midtones, midtone_weight(l)),
        (&wheels.highlights, highlight_weight(l)),
    ] {
        if weight > 0.0 && !wheel.is_identity() {
            c = apply_wheel(wheel, weight, c);
        }
    }
    c.to_array()
}

fn apply_wheel(wheel: &ColorWheel, weight: f32, mut c: Vec3) -> Vec3 {
    c += Vec3::splat(wheel.lift * weight);

    let gamma = 1.0 + (wheel.gamma - 1.0) * weight;
    if gamma != 1.0 {
        let inv = 1.0 / gamma;
        c = Vec3::new(
            c.x.max(0.0).powf(inv),
            c.y.max(0.0).powf(inv),
            c.z.max(0.0).powf(inv),
        );
    }

    c *= 1.0 + (wheel.gain - 1.0) * weight;

    if wheel.hue != 0.0 {
        c = hue_rotation(wheel.hue * weight) * c;
    }

    let sat = 1.0 + (wheel.saturation - 1.0) * weight;
    if sat != 1.0 {
        let l = Vec3::splat(luma(c.to_array()));
        c = l + (c - l) * sat;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_weight_regions() {
        assert_eq!(shadow_weight(0.0), 1.0);
        assert_eq!(midtone_weight(0.5), 1.0);
        assert!((highlight_weight(1.0) - 1.0).abs() < 1e-6);
        assert_eq!(highlight_weight(0.5), 0.0);
    }

    #[test]
    fn test_neutral_wheels_identity() {
        let rgb = [0.2, 0.5, 0.9];
        assert_eq!(apply_wheels(&ColorWheels::default(), rgb), rgb);
    }

    #[test]
    fn test_shadow_lift_brightens_darks_only() {
        let wheels = ColorWheels {
            shadows: ColorWheel {
                lift: 0.1,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        };
        let dark = apply_wheels(&wheels, [0.0, 0.0, 0.0]);
        assert!((dark[0] - 0.1).abs() < 1e-6);
        let bright = apply_wheels(&wheels, [0.9, 0.9, 0.9]);
        assert_eq!(bright, [0.9, 0.9, 0.9]);
    }

    #[test]
    fn test_highlight_gain() {
        let wheels = ColorWheels {
            highlights: ColorWheel {
                gain: 0.5,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        };
        let out = apply_wheels(&wheels, [1.0, 1.0, 1.0]);
        assert!((out[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_midtone_desaturate() {
        let wheels = ColorWheels {
            midtones: ColorWheel {
                saturation: 0.0,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        };
        let out = apply_wheels(&wheels, [0.6, 0.5, 0.4]);
        assert!((out[0] - out[1]).abs() < 1e-5);
        assert!((out[1] - out[2]).abs() < 1e-5);
    }

    #[test]
    fn test_hue_rotation_keeps_gray() {
        let gray = hue_rotation(90.0) * Vec3::splat(0.5);
        assert!((gray - Vec3::splat(0.5)).abs().max_element() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_weights_sum_to_one(l in 0.0f32..=1.0) {
            let sum = shadow_weight(l) + midtone_weight(l) + highlight_weight(l);
            prop_assert!((sum - 1.0).abs() < 1e-5);
        }
    }
}
