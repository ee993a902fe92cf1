use snapcut_core::Frame;

/// Edge the `to` region grows from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Origin {
    Left,
    Right,
    Top,
    Bottom,
}

pub(crate) fn wipe(from: &Frame, to: &Frame, p: f32, origin: Origin) -> Frame {
    let w = from.width() as f32;
    let h = from.height() as f32;
    Frame::from_fn(from.width(), from.height(), |x, y| {
        // sample at pixel centers
        let cx = x as f32 + 0.5;
        let cy = y as f32 + 0.5;
        let inside = match origin {
            Origin::Left => cx < w * p,
            Origin::Right => cx >= w * (1.0 - p),
            Origin::Top => cy < h * p,
            Origin::Bottom => cy >= h * (1.0 - p),
        };
        if inside {
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
    fn test_wipe_from_right_edge() {
        let a = Frame::filled(10, 1, Color::RED);
        let b = Frame::filled(10, 1, Color::BLUE);
        let out = wipe(&a, &b, 0.3, Origin::Right);
        assert_eq!(out.pixel(9, 0), Color::BLUE);
        assert_eq!(out.pixel(7, 0), Color::BLUE);
        assert_eq!(out.pixel(6, 0), Color::RED);
        assert_eq!(out.pixel(0, 0), Color::RED);
    }

    #[test]
    fn test_wipe_from_top_edge() {
        let a = Frame::filled(1, 10, Color::RED);
        let b = Frame::filled(1, 10, Color::BLUE);
        let out = wipe(&a, &b, 0.5, Origin::Top);
        assert_eq!(out.pixel(0, 0), Color::BLUE);
        assert_eq!(out.pixel(0, 4), Color::BLUE);
        assert_eq!(out.pixel(0, 5), Color::RED);
    }
}
