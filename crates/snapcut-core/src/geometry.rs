//! Geometric primitives for 2D transformations.

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2 as GlamVec2};
use serde::{Deserialize, Serialize};

/// 2D vector.
pub type Vec2 = GlamVec2;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest rectangle containing every point.
    pub fn bounding(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Compute intersection with another rectangle.
    pub fn intersection(self, other: Self) -> Option<Self> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = (self.x + self.width).min(other.x + other.width);
        let y2 = (self.y + self.height).min(other.y + other.height);

        if x1 < x2 && y1 < y2 {
            Some(Self::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }
}

/// 2D affine transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    inner: Affine2,
}

impl Transform2D {
    /// Identity transform.
    pub const IDENTITY: Self = Self {
        inner: Affine2::IDENTITY,
    };

    /// Create a translation transform.
    #[inline]
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            inner: Affine2::from_translation(Vec2::new(x, y)),
        }
    }

    /// Create a scale transform.
    #[inline]
    pub fn scale(x: f32, y: f32) -> Self {
        Self {
            inner: Affine2::from_scale(Vec2::new(x, y)),
        }
    }

    /// Create a rotation transform (radians).
    #[inline]
    pub fn rotate(angle: f32) -> Self {
        Self {
            inner: Affine2::from_angle(angle),
        }
    }

    /// Combine two transforms: `other` is applied first, then `self`.
    #[inline]
    pub fn then(self, other: Self) -> Self {
        Self {
            inner: self.inner * other.inner,
        }
    }

    /// Transform a point.
    #[inline]
    pub fn transform_point(self, point: Vec2) -> Vec2 {
        self.inner.transform_point2(point)
    }

    /// Get the inverse transform.
    #[inline]
    pub fn inverse(self) -> Self {
        Self {
            inner: self.inner.inverse(),
        }
    }

    /// Whether the transform is invertible (non-zero determinant).
    #[inline]
    pub fn is_invertible(self) -> bool {
        self.inner.matrix2.determinant().abs() > f32::EPSILON
    }

    /// Whether this is exactly the identity.
    #[inline]
    pub fn is_identity(self) -> bool {
        self.inner == Affine2::IDENTITY
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
