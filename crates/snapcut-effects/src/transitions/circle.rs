use snapcut_core::Frame;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Iris {
    /// `to` inside a disc growing from the center.
    Open,
    /// `from` inside a disc shrinking to the center.
    Close,
}

pub(crate) fn circle(from: &Frame, to: &Frame, p: f32, iris: Iris) -> Frame {
    let cx = from.width() as f32 * 0.5;
    let cy = from.height() as f32 * 0.5;
    let max_radius = (cx * cx + cy * cy).sqrt();
    let radius = match iris {
        Iris::Open => p * max_radius,
        Iris::Close => (1.0 - p) * max_radius,
    };
    let r2 = radius * radius;
    Frame::from_fn(from.width(), from.height(), |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let inside = dx * dx + dy * dy < r2;
        let use_to = match iris {
            Iris::Open => inside,
            Iris::Close => !inside,
        };
        if use_to {
            to.pixel(x, y)
        } else {
            from.pixel(x, y)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapcut_core::Color;

    #[test]
    fn test_circle_open_center_first() {
        let a = Frame::filled(10, 10, Color::RED);
        let b = Frame::filled(10, 10, Color::BLUE);
        let out = circle(&a, &b, 0.2, Iris::Open);
        assert_eq!(out.pixel(5, 5), Color::BLUE);
        assert_eq!(out.pixel(0, 0), Color::RED);
    }

    #[test]
    fn test_circle_close_corners_first() {
        let a = Frame::filled(10, 10, Color::RED);
        let b = Frame::filled(10, 10, Color::BLUE);
        let out = circle(&a, &b, 0.2, Iris::Close);
        assert_eq!(out.pixel(5, 5), Color::RED);
        assert_eq!(out.pixel(0, 0), Color::BLUE);
    }
}
