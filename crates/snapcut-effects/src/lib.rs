//! Snapcut Effects: clip effects, chroma keying and transitions.
//!
//! Effects are CPU pixel functions: each reads one frame and returns a new
//! one. Clip chains hold a closed [`Effect`] union and are validated once
//! per render through [`PreparedChain`].

pub mod chroma_key;
pub mod effect;
pub mod stylize;
pub mod transition;
mod transitions;

pub use chroma_key::{
    detect_key_color, light_wrap, ChromaKeySettings, ChromaKeyer, KeyAlgorithm, ScreenType,
};
pub use effect::{Effect, EffectInstance, PreparedChain, PreparedEffect};
pub use stylize::Stylize;
pub use transition::{blend, TransitionKind};
