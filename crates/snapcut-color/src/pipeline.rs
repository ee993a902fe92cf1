//! Grading pipeline: an ordered chain of color operations.
//!
//! Built once from a [`ColorGradingAdjustments`] record. Construction
//! clamps parameters, validates curves and LUTs and bakes film presets, so
//! applying the pipeline never fails.

use snapcut_core::{Color, Frame};
use tracing::debug;

use crate::adjustments::{ColorGradingAdjustments, ColorWheels, HslAdjustment, WhiteBalance};
use crate::curves::CurveTables;
use crate::error::ColorError;
use crate::film::FilmPreset;
use crate::hsl::apply_hsl;
use crate::lut::Lut3D;
use crate::transfer::LogFormat;
use crate::wheels::apply_wheels;
use crate::white_balance::apply_white_balance;

/// A single color operation in the pipeline.
#[derive(Debug, Clone)]
pub enum GradeOp {
    Linearize(LogFormat),
    WhiteBalance(WhiteBalance),
    Wheels(ColorWheels),
    Curves(Box<CurveTables>),
    Hsl(HslAdjustment),
    Lut(Lut3D),
    Film(FilmPreset, Lut3D),
}

impl GradeOp {
    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            Self::Linearize(format) => rgb.map(|v| format.to_linear(v)),
            Self::WhiteBalance(wb) => apply_white_balance(wb, rgb),
            Self::Wheels(wheels) => apply_wheels(wheels, rgb),
            Self::Curves(tables) => tables.apply(rgb),
            Self::Hsl(hsl) => apply_hsl(hsl, rgb),
            Self::Lut(lut) | Self::Film(_, lut) => lut.apply(rgb),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Linearize(_) => "linearize",
            Self::WhiteBalance(_) => "white_balance",
            Self::Wheels(_) => "wheels",
            Self::Curves(_) => "curves",
            Self::Hsl(_) => "hsl",
            Self::Lut(_) => "lut",
            Self::Film(..) => "film",
        }
    }
}

/// A validated grading pipeline.
#[derive(Debug, Clone, Default)]
pub struct GradingPipeline {
    ops: Vec<GradeOp>,
}

impl GradingPipeline {
    /// Build the operation chain: log→linear, white balance, wheels,
    /// curves, HSL, user LUT, film LUT. Identity stages are skipped.
    pub fn new(adjustments: &ColorGradingAdjustments) -> Result<Self, ColorError> {
        let adj = adjustments.clamped();
        adj.curves.validate()?;
        if let Some(lut) = &adj.lut {
            lut.validate()?;
        }

        let mut ops = Vec::new();
        if let Some(format) = adj.log_format {
            ops.push(GradeOp::Linearize(format));
        }
        if !adj.white_balance.is_identity() {
            ops.push(GradeOp::WhiteBalance(adj.white_balance));
        }
        if !adj.wheels.is_identity() {
            ops.push(GradeOp::Wheels(adj.wheels));
        }
        if !adj.curves.is_identity() {
            ops.push(GradeOp::Curves(Box::new(adj.curves.to_tables())));
        }
        if !adj.hsl.is_identity() {
            ops.push(GradeOp::Hsl(adj.hsl));
        }
        if let Some(lut) = adj.lut {
            ops.push(GradeOp::Lut(lut));
        }
        if let Some(preset) = adj.film {
            ops.push(GradeOp::Film(preset, preset.bake()?));
        }

        debug!(
            ops = ?ops.iter().map(GradeOp::name).collect::<Vec<_>>(),
            "Built grading pipeline"
        );
        Ok(Self { ops })
    }

    /// Operations in application order.
    pub fn ops(&self) -> &[GradeOp] {
        &self.ops
    }

    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// Grade one RGB triple; the result is clamped to [0, 1].
    #[inline]
    pub fn apply_rgb(&self, mut rgb: [f32; 3]) -> [f32; 3] {
        for op in &self.ops {
            rgb = op.apply(rgb);
        }
        rgb.map(|v| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) })
    }

    /// Grade one pixel, leaving alpha untouched.
    #[inline]
    pub fn apply_pixel(&self, px: Color) -> Color {
        if self.ops.is_empty() {
            return px;
        }
        px.with_rgb(self.apply_rgb(px.to_rgb()))
    }

    /// Grade a frame into a freshly allocated output.
    pub fn apply(&self, frame: &Frame) -> Frame {
        if self.ops.is_empty() {
            return frame.clone();
        }
        frame.map_pixels(|px| self.apply_pixel(px))
    }

    /// Sample the whole pipeline into a LUT of the given size.
    pub fn bake_lut(&self, size: usize) -> Result<Lut3D, ColorError> {
        Lut3D::from_fn(size, |rgb| self.apply_rgb(rgb))
    }
}

/// Grade a frame with a one-off pipeline.
pub fn grade_frame(frame: &Frame, adjustments: &ColorGradingAdjustments) -> Result<Frame, ColorError> {
    Ok(GradingPipeline::new(adjustments)?.apply(frame))
}
