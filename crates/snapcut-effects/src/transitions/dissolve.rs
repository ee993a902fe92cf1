use snapcut_core::Frame;

/// Straight cross-blend `from·(1−p) + to·p`.
pub(crate) fn cross(from: &Frame, to: &Frame, p: f32) -> Frame {
    Frame::from_fn(from.width(), from.height(), |x, y| {
        from.pixel(x, y).lerp(to.pixel(x, y), p)
    })
}
