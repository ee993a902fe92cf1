//! Tone curves.
//!
//! A curve is an ascending list of control points in [0, 1], evaluated
//! piecewise-linearly and clamped to its end outputs. For grading, each
//! curve is baked into a 256-entry table.

use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// Entries in a baked curve table.
pub const CURVE_TABLE_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub input: f32,
    pub output: f32,
}

impl CurvePoint {
    pub const fn new(input: f32, output: f32) -> Self {
        Self { input, output }
    }
}

/// A single-channel tone curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    points: Vec<CurvePoint>,
}

#[derive(Deserialize)]
struct RawCurve {
    points: Vec<CurvePoint>,
}

impl TryFrom<RawCurve> for Curve {
    type Error = ColorError;

    fn try_from(raw: RawCurve) -> Result<Self, Self::Error> {
        Self::new(raw.points)
    }
}

impl Curve {
    /// Build a curve, rejecting fewer than two points or non-ascending
    /// inputs. Coordinates are clamped to [0, 1].
    pub fn new(points: Vec<CurvePoint>) -> Result<Self, ColorError> {
        let curve = Self {
            points: points
                .into_iter()
                .map(|p| CurvePoint::new(p.input.clamp(0.0, 1.0), p.output.clamp(0.0, 1.0)))
                .collect(),
        };
        curve.validate()?;
        Ok(curve)
    }

    /// The identity curve (0,0)–(1,1).
    pub fn identity() -> Self {
        Self {
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
        }
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Check the invariants.
    pub fn validate(&self) -> Result<(), ColorError> {
        if self.points.len() < 2 {
            return Err(ColorError::InvalidCurve(format!(
                "need at least 2 control points, got {}",
                self.points.len()
            )));
        }
        if let Some(p) = self.points.iter().find(|p| !p.input.is_finite() || !p.output.is_finite()) {
            return Err(ColorError::InvalidCurve(format!("non-finite control point {p:?}")));
        }
        if self.points.windows(2).any(|w| w[0].input >= w[1].input) {
            return Err(ColorError::InvalidCurve(
                "control point inputs must be strictly ascending".into(),
            ));
        }
        Ok(())
    }

    /// Whether every control point maps its input to itself across the
    /// whole [0, 1] domain.
    pub fn is_identity(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                first.input == 0.0
                    && last.input == 1.0
                    && self.points.iter().all(|p| p.input == p.output)
            }
            _ => false,
        }
    }

    /// Piecewise-linear evaluation, clamped to the end outputs.
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return x,
        };
        if x <= first.input {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }
        let i = self
            .points
            .partition_point(|p| p.input <= x)
            .saturating_sub(1);
        let a = self.points[i];
        let b = self.points[i + 1];
        let t = (x - a.input) / (b.input - a.input);
        a.output + (b.output - a.output) * t
    }

    /// Bake into a lookup table.
    pub fn to_table(&self) -> CurveTable {
        let mut table = [0.0f32; CURVE_TABLE_SIZE];
        for (i, v) in table.iter_mut().enumerate() {
            *v = self.evaluate(i as f32 / (CURVE_TABLE_SIZE - 1) as f32);
        }
        CurveTable(table)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::identity()
    }
}

/// A 256-entry baked curve, read with linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTable([f32; CURVE_TABLE_SIZE]);

impl CurveTable {
    #[inline]
    pub fn lookup(&self, v: f32) -> f32 {
        let x = v.clamp(0.0, 1.0) * (CURVE_TABLE_SIZE - 1) as f32;
        let i = (x as usize).min(CURVE_TABLE_SIZE - 2);
        let f = x - i as f32;
        self.0[i] + (self.0[i + 1] - self.0[i]) * f
    }
}

/// Master plus per-channel curves.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurvesAdjustment {
    pub master: Curve,
    pub red: Curve,
    pub green: Curve,
    pub blue: Curve,
}

impl CurvesAdjustment {
    pub fn is_identity(&self) -> bool {
        self.master.is_identity()
            && self.red.is_identity()
            && self.green.is_identity()
            && self.blue.is_identity()
    }

    pub fn validate(&self) -> Result<(), ColorError> {
        for (name, curve) in [
            ("master", &self.master),
            ("red", &self.red),
            ("green", &self.green),
            ("blue", &self.blue),
        ] {
            curve
                .validate()
                .map_err(|e| ColorError::InvalidCurve(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    pub fn to_tables(&self) -> CurveTables {
        CurveTables {
            master: self.master.to_table(),
            rgb: [self.red.to_table(), self.green.to_table(), self.blue.to_table()],
        }
    }
}

/// Baked tables for a [`CurvesAdjustment`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurveTables {
    master: CurveTable,
    rgb: [CurveTable; 3],
}

impl CurveTables {
    /// Master curve first, then the per-channel curves.
    #[inline]
    pub fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        let mut out = [0.0; 3];
        for c in 0..3 {
            out[c] = self.rgb[c].lookup(self.master.lookup(rgb[c]));
        }
        out
    }
}
