//! Frame buffers for the compositing pipeline.
//!
//! Frames hold straight-alpha RGBA `f32` pixels in row-major order. Pixel
//! operations never mutate their input: they read one buffer and produce a
//! freshly allocated one, which keeps them trivially parallel.

use rayon::prelude::*;

use crate::color::Color;
use crate::error::{Result, SnapcutError};

/// A video frame in CPU memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Frame {
    /// Create a new frame cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Create a new transparent frame, reporting allocation failure instead
    /// of aborting.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| {
                SnapcutError::ResourceExhausted(format!("{width}x{height} frame overflows"))
            })?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            SnapcutError::ResourceExhausted(format!("{width}x{height} frame: {e}"))
        })?;
        pixels.resize(len, Color::TRANSPARENT);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a frame filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Wrap an existing pixel buffer.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(SnapcutError::InvalidParameter(format!(
                "pixel buffer has {} entries, expected {}",
                pixels.len(),
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a frame by evaluating `f` at every pixel, rows in parallel.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> Color + Sync,
    {
        let mut pixels = vec![Color::TRANSPARENT; width as usize * height as usize];
        if width > 0 {
            pixels
                .par_chunks_mut(width as usize)
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, px) in row.iter_mut().enumerate() {
                        *px = f(x as u32, y as u32);
                    }
                });
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Decode 8-bit RGBA bytes.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SnapcutError::InvalidParameter(format!(
                "RGBA8 buffer has {} bytes, expected {}",
                data.len(),
                expected
            )));
        }
        let pixels = data
            .par_chunks_exact(4)
            .map(|p| Color::from_rgba8(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Encode to 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .par_iter()
            .flat_map_iter(|c| c.to_rgba8())
            .collect()
    }

    /// Raw byte view of the float pixels, for sinks that accept RGBA32F.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Whether both frames share a resolution.
    #[inline]
    pub fn same_size(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel at (x, y). Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Pixel at signed coordinates, `None` outside the frame.
    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.pixels[self.index(x as u32, y as u32)])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Reset every pixel to `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Apply `f` to every pixel into a new frame.
    pub fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn(Color) -> Color + Sync,
    {
        Self {
            width: self.width,
            height: self.height,
            pixels: self.pixels.par_iter().map(|&c| f(c)).collect(),
        }
    }

    /// Bilinear sample at continuous coordinates where pixel centers sit at
    /// integer + 0.5. Returns transparent outside the frame. Interpolates in
    /// premultiplied space so transparent texels carry no color.
    pub fn sample_bilinear(&self, x: f32, y: f32) -> Color {
        let w = self.width as f32;
        let h = self.height as f32;
        if self.pixels.is_empty() || x < 0.0 || y < 0.0 || x > w || y > h {
            return Color::TRANSPARENT;
        }
        let fx = (x - 0.5).clamp(0.0, w - 1.0);
        let fy = (y - 0.5).clamp(0.0, h - 1.0);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let texel = |x, y| self.pixel(x, y).premultiplied();
        let top = texel(x0, y0).lerp(texel(x1, y0), tx);
        let bottom = texel(x0, y1).lerp(texel(x1, y1), tx);
        top.lerp(bottom, ty).unpremultiplied()
    }

    /// Total memory usage of the pixel buffer in bytes.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of_val(self.pixels.as_slice())
    }

    /// Create a test pattern frame (color bars).
    pub fn test_pattern(width: u32, height: u32) -> Self {
        const BARS: [[u8; 4]; 8] = [
            [255, 255, 255, 255], // White
            [255, 255, 0, 255],   // Yellow
            [0, 255, 255, 255],   // Cyan
            [0, 255, 0, 255],     // Green
            [255, 0, 255, 255],   // Magenta
            [255, 0, 0, 255],     // Red
            [0, 0, 255, 255],     // Blue
            [0, 0, 0, 255],       // Black
        ];
        Self::from_fn(width, height, |x, _| {
            let [r, g, b, a] = BARS[(x * 8 / width.max(1)) as usize];
            Color::from_rgba8(r, g, b, a)
        })
    }
}
