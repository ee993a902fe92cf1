//! Temperature and tint.

use crate::adjustments::WhiteBalance;

/// Channel swing at ±100.
const STRENGTH: f32 = 0.3;

/// Per-channel gains for a white balance setting.
pub fn channel_gains(wb: &WhiteBalance) -> [f32; 3] {
    let t = wb.temperature / 100.0 * STRENGTH;
    let n = wb.tint / 100.0 * STRENGTH;
    [
        (1.0 + t) * (1.0 + n * 0.5),
        1.0 - n,
        (1.0 - t) * (1.0 + n * 0.5),
    ]
}

pub fn apply_white_balance(wb: &WhiteBalance, rgb: [f32; 3]) -> [f32; 3] {
    let gains = channel_gains(wb);
    [rgb[0] * gains[0], rgb[1] * gains[1], rgb[2] * gains[2]]
}
