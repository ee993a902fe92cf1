use snapcut_core::{Color, Frame};

/// `to` scaled by `scale` about the frame center, alpha-blended over
/// `from` by `p`.
pub(crate) fn zoom(from: &Frame, to: &Frame, p: f32, scale: f32) -> Frame {
    let cx = from.width() as f32 * 0.5;
    let cy = from.height() as f32 * 0.5;
    let inv = if scale > f32::EPSILON { 1.0 / scale } else { 0.0 };
    Frame::from_fn(from.width(), from.height(), |x, y| {
        let scaled = if inv == 0.0 {
            Color::TRANSPARENT
        } else {
            let sx = cx + (x as f32 + 0.5 - cx) * inv;
            let sy = cy + (y as f32 + 0.5 - cy) * inv;
            to.sample_bilinear(sx, sy)
        };
        from.pixel(x, y).lerp(scaled, p)
    })
}
