//! Snapcut Color: grading, LUTs and log transfer curves.
//!
//! Every operation here is a pure function of (pixel, parameters).
//! [`GradingPipeline`] validates a [`ColorGradingAdjustments`] record once
//! and then grades frames without further checks.

pub mod adjustments;
pub mod curves;
pub mod error;
pub mod film;
pub mod hsl;
pub mod lut;
pub mod pipeline;
pub mod transfer;
pub mod wheels;
pub mod white_balance;

pub use adjustments::{ColorGradingAdjustments, ColorWheel, ColorWheels, HslAdjustment, WhiteBalance};
pub use curves::{Curve, CurvePoint, CurvesAdjustment};
pub use error::ColorError;
pub use film::FilmPreset;
pub use lut::Lut3D;
pub use pipeline::{grade_frame, GradingPipeline};
pub use transfer::LogFormat;
pub use wheels::{highlight_weight, midtone_weight, shadow_weight};
