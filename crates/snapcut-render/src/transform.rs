//! Clip placement on the canvas.
//!
//! A clip frame is resampled onto a canvas-sized layer by inverse mapping
//! every output pixel center through the clip transform and sampling the
//! source bilinearly. Pixels that map outside the source are transparent.

use snapcut_core::{Color, Frame, Rect, Transform2D, Vec2};
use snapcut_timeline::ClipTransform;

/// Matrix taking source pixel coordinates to canvas coordinates.
///
/// The anchor (normalized source coordinates) lands at the canvas center
/// offset by `position`; scale and rotation pivot about it.
pub fn layer_transform(
    transform: &ClipTransform,
    source_size: (u32, u32),
    canvas_size: (u32, u32),
) -> Transform2D {
    let source = Vec2::new(source_size.0 as f32, source_size.1 as f32);
    let canvas = Vec2::new(canvas_size.0 as f32, canvas_size.1 as f32);
    let pivot = transform.anchor * source;
    let target = canvas * 0.5 + transform.position;

    Transform2D::translate(target.x, target.y)
        .then(Transform2D::rotate(transform.rotation.to_radians()))
        .then(Transform2D::scale(transform.scale.x, transform.scale.y))
        .then(Transform2D::translate(-pivot.x, -pivot.y))
}

/// Resample `source` onto a `width`×`height` layer.
pub fn place(source: Frame, transform: &ClipTransform, width: u32, height: u32) -> Frame {
    if transform.is_identity_placement() && source.width() == width && source.height() == height {
        return source;
    }

    let matrix = layer_transform(transform, (source.width(), source.height()), (width, height));
    if !matrix.is_invertible() {
        return Frame::new(width, height);
    }
    let Some(footprint) = footprint(&matrix, &source, width, height) else {
        return Frame::new(width, height);
    };
    let inverse = matrix.inverse();
    Frame::from_fn(width, height, |x, y| {
        let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        if !footprint.contains(center) {
            return Color::TRANSPARENT;
        }
        let p = inverse.transform_point(center);
        source.sample_bilinear(p.x, p.y)
    })
}

/// Canvas area the transformed source can cover, padded by half a pixel.
fn footprint(matrix: &Transform2D, source: &Frame, width: u32, height: u32) -> Option<Rect> {
    let (w, h) = (source.width() as f32, source.height() as f32);
    let corners = [
        Vec2::ZERO,
        Vec2::new(w, 0.0),
        Vec2::new(0.0, h),
        Vec2::new(w, h),
    ]
    .map(|c| matrix.transform_point(c));
    let bounds = Rect::bounding(&corners)?;
    let padded = Rect::new(
        bounds.x - 0.5,
        bounds.y - 0.5,
        bounds.width + 1.0,
        bounds.height + 1.0,
    );
    padded.intersection(Rect::new(0.0, 0.0, width as f32, height as f32))
}
