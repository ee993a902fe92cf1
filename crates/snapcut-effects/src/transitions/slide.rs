use snapcut_core::{Color, Frame};

/// Horizontal slide. `direction` is -1 for leftward motion, 1 for
/// rightward. `from` moves by `p·w`; `to` trails it by one frame width.
pub(crate) fn slide(from: &Frame, to: &Frame, p: f32, direction: i64) -> Frame {
    let w = from.width() as i64;
    let offset = (w as f32 * p).round() as i64 * direction;
    Frame::from_fn(from.width(), from.height(), |x, y| {
        let (x, y) = (x as i64, y as i64);
        // sample position in each source
        let from_x = x - offset;
        let to_x = from_x + w * direction;
        from.get(from_x, y)
            .or_else(|| to.get(to_x, y))
            .unwrap_or(Color::TRANSPARENT)
    })
}
