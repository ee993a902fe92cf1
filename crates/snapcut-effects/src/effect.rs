//! Clip effect chains.
//!
//! [`Effect`] is a closed union of every effect kind. A chain is prepared
//! once per render: preparation validates parameters and builds grading
//! pipelines and keyers, so a configuration error surfaces before any
//! pixel is touched. Effects run in authored order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use snapcut_color::{ColorGradingAdjustments, GradingPipeline};
use snapcut_core::{Frame, Result};
use tracing::debug;

use crate::chroma_key::{ChromaKeySettings, ChromaKeyer};
use crate::stylize::Stylize;

/// Effect parameters, one variant per effect kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "params")]
pub enum Effect {
    ColorGrade(ColorGradingAdjustments),
    ChromaKey(ChromaKeySettings),
    Stylize(Stylize),
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ColorGrade(_) => "Color Grade",
            Self::ChromaKey(_) => "Chroma Key",
            Self::Stylize(Stylize::Grayscale) => "Grayscale",
            Self::Stylize(Stylize::Sepia { .. }) => "Sepia",
            Self::Stylize(Stylize::Invert) => "Invert",
            Self::Stylize(Stylize::OldFilm { .. }) => "Old Film",
        }
    }
}

/// An effect placed in a clip's chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub effect: Effect,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl EffectInstance {
    pub fn new(effect: Effect) -> Self {
        Self {
            effect,
            enabled: true,
        }
    }

    pub fn disabled(effect: Effect) -> Self {
        Self {
            effect,
            enabled: false,
        }
    }
}

/// A validated effect ready to run.
#[derive(Debug, Clone)]
pub enum PreparedEffect {
    Grade(GradingPipeline),
    Key(ChromaKeyer),
    Stylize(Stylize),
}

impl PreparedEffect {
    pub fn prepare(effect: &Effect) -> Result<Self> {
        Ok(match effect {
            Effect::ColorGrade(adj) => Self::Grade(GradingPipeline::new(adj)?),
            Effect::ChromaKey(settings) => Self::Key(ChromaKeyer::new(settings)?),
            Effect::Stylize(s) => Self::Stylize(s.clamped()),
        })
    }

    /// Run the effect. `seed` identifies the frame for effects with
    /// per-frame variation.
    pub fn apply(&self, frame: &Frame, seed: u64) -> Frame {
        match self {
            Self::Grade(pipeline) => pipeline.apply(frame),
            Self::Key(keyer) => keyer.apply(frame),
            Self::Stylize(s) => s.apply(frame, seed),
        }
    }
}

/// The enabled effects of one chain, validated and in authored order.
#[derive(Debug, Clone, Default)]
pub struct PreparedChain {
    effects: SmallVec<[PreparedEffect; 4]>,
    seed: u64,
}

impl PreparedChain {
    /// Validate every enabled effect. Disabled effects are skipped without
    /// validation.
    pub fn new(chain: &[EffectInstance]) -> Result<Self> {
        let effects = chain
            .iter()
            .filter(|inst| inst.enabled)
            .map(|inst| PreparedEffect::prepare(&inst.effect))
            .collect::<Result<SmallVec<_>>>()?;
        if effects.len() < chain.len() {
            debug!(
                skipped = chain.len() - effects.len(),
                "Skipped disabled effects"
            );
        }
        Ok(Self { effects, seed: 0 })
    }

    /// Frame seed passed to every effect, typically the render time in
    /// microseconds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Run the chain, each effect reading the previous effect's output.
    pub fn apply(&self, frame: &Frame) -> Frame {
        let mut effects = self.effects.iter();
        let Some(first) = effects.next() else {
            return frame.clone();
        };
        effects.fold(first.apply(frame, self.seed), |acc, effect| {
            effect.apply(&acc, self.seed)
        })
    }

    /// Strongest light wrap requested by a keyer in the chain.
    pub fn light_wrap(&self) -> Option<f32> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                PreparedEffect::Key(keyer) if keyer.settings().light_wrap > 0.0 => {
                    Some(keyer.settings().light_wrap)
                }
                _ => None,
            })
            .reduce(f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroma_key::KeyAlgorithm;
    use snapcut_color::{ColorWheel, ColorWheels};
    use snapcut_core::Color;

    fn brighten() -> Effect {
        Effect::ColorGrade(ColorGradingAdjustments {
            wheels: ColorWheels {
                shadows: ColorWheel {
                    lift: 0.5,
                    ..ColorWheel::NEUTRAL
                },
                ..Default::default()
            },
            ..Default::default()
        })
    }

    #[test]
    fn test_order_matters() {
        let frame = Frame::filled(2, 2, Color::BLACK);
        let grade_then_invert = PreparedChain::new(&[
            EffectInstance::new(brighten()),
            EffectInstance::new(Effect::Stylize(Stylize::Invert)),
        ])
        .unwrap();
        let invert_then_grade = PreparedChain::new(&[
            EffectInstance::new(Effect::Stylize(Stylize::Invert)),
            EffectInstance::new(brighten()),
        ])
        .unwrap();
        assert_ne!(
            grade_then_invert.apply(&frame),
            invert_then_grade.apply(&frame)
        );
    }

    #[test]
    fn test_disabled_effect_skipped() {
        let chain = PreparedChain::new(&[EffectInstance::disabled(Effect::Stylize(
            Stylize::Invert,
        ))])
        .unwrap();
        assert!(chain.is_empty());
        let frame = Frame::test_pattern(8, 2);
        assert_eq!(chain.apply(&frame), frame);
    }

    #[test]
    fn test_invalid_key_fails_prepare() {
        let bad = Effect::ChromaKey(ChromaKeySettings {
            algorithm: KeyAlgorithm::ColorDistance,
            key_color: None,
            ..Default::default()
        });
        assert!(PreparedChain::new(&[EffectInstance::new(bad)]).is_err());
    }

    #[test]
    fn test_light_wrap_reported() {
        let key = Effect::ChromaKey(ChromaKeySettings {
            light_wrap: 0.4,
            ..Default::default()
        });
        let chain = PreparedChain::new(&[EffectInstance::new(key)]).unwrap();
        assert_eq!(chain.light_wrap(), Some(0.4));
    }

    #[test]
    fn test_effect_json_shape() {
        let json = serde_json::to_value(EffectInstance::new(Effect::Stylize(Stylize::Invert)))
            .unwrap();
        assert_eq!(json["effect"]["kind"], "Stylize");
        let back: EffectInstance = serde_json::from_value(json).unwrap();
        assert!(back.enabled);
    }
}
