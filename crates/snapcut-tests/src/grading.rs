//! Integration tests for color grading.
//!
//! Properties of the full grading pipeline and LUT import/export, run
//! through the effect chain the compositor uses.

use proptest::prelude::*;
use snapcut_color::{
    ColorGradingAdjustments, ColorWheel, ColorWheels, Curve, CurvePoint, CurvesAdjustment,
    FilmPreset, GradingPipeline, HslAdjustment, LogFormat, Lut3D, WhiteBalance,
};
use snapcut_core::{Color, Frame};
use snapcut_effects::{Effect, EffectInstance, PreparedChain};

fn film_look() -> ColorGradingAdjustments {
    ColorGradingAdjustments {
        white_balance: WhiteBalance {
            temperature: 15.0,
            tint: -5.0,
        },
        wheels: ColorWheels {
            shadows: ColorWheel {
                lift: 0.05,
                ..ColorWheel::NEUTRAL
            },
            midtones: ColorWheel {
                gamma: 1.1,
                ..ColorWheel::NEUTRAL
            },
            ..Default::default()
        },
        curves: CurvesAdjustment {
            master: Curve::new(vec![
                CurvePoint::new(0.0, 0.05),
                CurvePoint::new(0.5, 0.55),
                CurvePoint::new(1.0, 0.95),
            ])
            .unwrap(),
            ..Default::default()
        },
        hsl: HslAdjustment {
            hue_shift: 5.0,
            saturation: 0.9,
            lightness: 0.0,
        },
        film: Some(FilmPreset::Kodak2383),
        ..Default::default()
    }
}

// ── Identity ───────────────────────────────────────────────────

#[test]
fn identity_grade_through_effect_chain_is_noop() {
    let chain = PreparedChain::new(&[EffectInstance::new(Effect::ColorGrade(
        ColorGradingAdjustments::default(),
    ))])
    .unwrap();
    let frame = Frame::test_pattern(32, 4);
    let out = chain.apply(&frame);
    for (a, b) in out.pixels().iter().zip(frame.pixels()) {
        for (x, y) in a.to_rgb().iter().zip(b.to_rgb()) {
            assert!((x - y).abs() < 1e-5);
        }
    }
}

#[test]
fn identity_lut_grade_is_noop() {
    for size in [17, 33, 65] {
        let adj = ColorGradingAdjustments {
            lut: Some(Lut3D::identity(size).unwrap()),
            ..Default::default()
        };
        let pipeline = GradingPipeline::new(&adj).unwrap();
        let frame = Frame::test_pattern(16, 2);
        let out = pipeline.apply(&frame);
        for (a, b) in out.pixels().iter().zip(frame.pixels()) {
            assert!((a.r - b.r).abs() < 1e-5 && (a.g - b.g).abs() < 1e-5 && (a.b - b.b).abs() < 1e-5);
        }
    }
}

// ── LUT export ─────────────────────────────────────────────────

#[test]
fn exported_lut_reproduces_grade() {
    let adj = film_look();
    let pipeline = GradingPipeline::new(&adj).unwrap();
    let cube = pipeline.bake_lut(33).unwrap().to_cube("film look");

    let reimported = ColorGradingAdjustments {
        lut: Some(Lut3D::from_cube(&cube).unwrap()),
        ..Default::default()
    };
    let via_lut = GradingPipeline::new(&reimported).unwrap();

    for rgb in [[0.1, 0.2, 0.3], [0.5, 0.5, 0.5], [0.9, 0.4, 0.1], [0.02, 0.8, 0.6]] {
        let direct = pipeline.apply_rgb(rgb);
        let baked = via_lut.apply_rgb(rgb);
        for c in 0..3 {
            assert!((direct[c] - baked[c]).abs() < 0.02, "{rgb:?}: {direct:?} vs {baked:?}");
        }
    }
}

#[test]
fn malformed_lut_rejected_before_rendering() {
    let effect = serde_json::from_str::<Effect>(
        r#"{"kind":"ColorGrade","params":{"lut":{"size":33,"data":[0.0,0.5,1.0]}}}"#,
    );
    let err = effect.unwrap_err().to_string();
    assert!(err.contains("expected 107811"), "{err}");

    let bad_size = Lut3D::from_flat(20, vec![0.0; 20 * 20 * 20 * 3]).unwrap_err();
    assert!(matches!(
        snapcut_core::SnapcutError::from(bad_size),
        snapcut_core::SnapcutError::Configuration(_)
    ));
}

#[test]
fn log_footage_is_linearized_first() {
    let adj = ColorGradingAdjustments {
        log_format: Some(LogFormat::LogC),
        ..Default::default()
    };
    let pipeline = GradingPipeline::new(&adj).unwrap();
    let encoded = LogFormat::LogC.from_linear(0.18);
    let out = pipeline.apply_rgb([encoded; 3]);
    assert!((out[0] - 0.18).abs() < 1e-3);
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn grade_keeps_alpha_and_range(
        r in 0.0f32..=1.0, g in 0.0f32..=1.0, b in 0.0f32..=1.0, a in 0.0f32..=1.0,
        lift in -1.0f32..=1.0, gain in 0.0f32..=4.0, sat in 0.0f32..=2.0,
    ) {
        let adj = ColorGradingAdjustments {
            wheels: ColorWheels {
                midtones: ColorWheel { lift, gain, ..ColorWheel::NEUTRAL },
                ..Default::default()
            },
            hsl: HslAdjustment { saturation: sat, ..Default::default() },
            ..film_look()
        };
        let pipeline = GradingPipeline::new(&adj).unwrap();
        let out = pipeline.apply_pixel(Color::new(r, g, b, a));
        prop_assert_eq!(out.a, a);
        for v in out.to_rgb() {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn identity_grade_within_tolerance(r in 0.0f32..=1.0, g in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let pipeline = GradingPipeline::new(&ColorGradingAdjustments::default()).unwrap();
        let out = pipeline.apply_rgb([r, g, b]);
        prop_assert!((out[0] - r).abs() < 1e-5);
        prop_assert!((out[1] - g).abs() < 1e-5);
        prop_assert!((out[2] - b).abs() < 1e-5);
    }
}
