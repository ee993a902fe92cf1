//! Integration tests for chroma keying inside effect chains.

use proptest::prelude::*;
use snapcut_color::{ColorGradingAdjustments, HslAdjustment};
use snapcut_core::{Color, Frame, SnapcutError};
use snapcut_effects::{
    detect_key_color, ChromaKeySettings, ChromaKeyer, Effect, EffectInstance, KeyAlgorithm,
    PreparedChain, ScreenType,
};

/// Green screen with a magenta block in the middle.
fn plate() -> Frame {
    Frame::from_fn(12, 12, |x, y| {
        if (4..8).contains(&x) && (4..8).contains(&y) {
            Color::rgb(0.8, 0.2, 0.7)
        } else {
            Color::rgb(0.1, 0.85, 0.15)
        }
    })
}

#[test]
fn sampled_key_color_drives_color_distance_key() {
    let frame = plate();
    let key = detect_key_color(&frame, 0, 0, 3).unwrap();
    assert!((key[1] - 0.85).abs() < 1e-5);

    let keyer = ChromaKeyer::new(&ChromaKeySettings {
        key_color: Some(key),
        algorithm: KeyAlgorithm::ColorDistance,
        ..Default::default()
    })
    .unwrap();
    let out = keyer.apply(&frame);
    assert_eq!(out.pixel(0, 0).a, 0.0);
    assert_eq!(out.pixel(5, 5).a, 1.0);
}

#[test]
fn every_algorithm_keeps_the_subject() {
    let frame = plate();
    let key = detect_key_color(&frame, 0, 0, 2);
    for algorithm in [
        KeyAlgorithm::ColorDistance,
        KeyAlgorithm::ColorDifference,
        KeyAlgorithm::HslKey,
        KeyAlgorithm::AdvancedEdge,
    ] {
        let keyer = ChromaKeyer::new(&ChromaKeySettings {
            key_color: key,
            algorithm,
            ..Default::default()
        })
        .unwrap();
        let out = keyer.apply(&frame);
        assert!(out.pixel(0, 0).a < 0.05, "{algorithm:?} kept the screen");
        assert!(out.pixel(6, 6).a > 0.95, "{algorithm:?} dropped the subject");
    }
}

#[test]
fn missing_key_color_is_a_configuration_error() {
    for (algorithm, screen) in [
        (KeyAlgorithm::ColorDistance, ScreenType::Green),
        (KeyAlgorithm::HslKey, ScreenType::Blue),
        (KeyAlgorithm::ColorDifference, ScreenType::Custom),
    ] {
        let settings = ChromaKeySettings {
            algorithm,
            screen,
            key_color: None,
            ..Default::default()
        };
        let err = PreparedChain::new(&[EffectInstance::new(Effect::ChromaKey(settings))]).unwrap_err();
        assert!(matches!(err, SnapcutError::Configuration(_)));
    }
}

#[test]
fn key_then_grade_differs_from_grade_then_key() {
    let key = EffectInstance::new(Effect::ChromaKey(ChromaKeySettings::green_screen()));
    let desaturate = EffectInstance::new(Effect::ColorGrade(ColorGradingAdjustments {
        hsl: HslAdjustment {
            saturation: 0.0,
            ..Default::default()
        },
        ..Default::default()
    }));
    let frame = plate();

    let key_first = PreparedChain::new(&[key.clone(), desaturate.clone()]).unwrap().apply(&frame);
    let grade_first = PreparedChain::new(&[desaturate, key]).unwrap().apply(&frame);

    // keyed before grading, the screen is gone
    assert_eq!(key_first.pixel(0, 0).a, 0.0);
    // graded first, the screen is gray and no longer keys
    assert!(grade_first.pixel(0, 0).a > 0.5);
}

#[test]
fn edge_blur_softens_matte_boundary() {
    let frame = plate();
    let hard = ChromaKeyer::new(&ChromaKeySettings::green_screen()).unwrap();
    let soft = ChromaKeyer::new(&ChromaKeySettings {
        edge_blur: 2,
        ..ChromaKeySettings::green_screen()
    })
    .unwrap();
    let hard_edge = hard.compute_matte(&frame)[4 * 12 + 4];
    let soft_edge = soft.compute_matte(&frame)[4 * 12 + 4];
    assert!(soft_edge < hard_edge);
    assert!(soft_edge > 0.0);
}

proptest! {
    #[test]
    fn luma_key_ignores_key_color(
        r in 0.0f32..=1.0, g in 0.0f32..=1.0, b in 0.0f32..=1.0,
        k1 in prop::array::uniform3(0.0f32..=1.0),
        k2 in prop::array::uniform3(0.0f32..=1.0),
    ) {
        let keyer = |key: [f32; 3]| {
            ChromaKeyer::new(&ChromaKeySettings {
                key_color: Some(key),
                algorithm: KeyAlgorithm::LumaKey,
                screen: ScreenType::Custom,
                ..Default::default()
            })
            .unwrap()
        };
        prop_assert_eq!(keyer(k1).compute_alpha([r, g, b]), keyer(k2).compute_alpha([r, g, b]));
    }

    #[test]
    fn key_alpha_in_unit_range(
        rgb in prop::array::uniform3(0.0f32..=1.0),
        threshold in 0.0f32..=1.0,
        tolerance in 0.0f32..=1.0,
    ) {
        for algorithm in [KeyAlgorithm::ColorDistance, KeyAlgorithm::ColorDifference, KeyAlgorithm::HslKey, KeyAlgorithm::LumaKey] {
            let keyer = ChromaKeyer::new(&ChromaKeySettings {
                key_color: Some([0.0, 1.0, 0.0]),
                algorithm,
                threshold,
                tolerance,
                ..Default::default()
            })
            .unwrap();
            let a = keyer.compute_alpha(rgb);
            prop_assert!((0.0..=1.0).contains(&a));
        }
    }
}
