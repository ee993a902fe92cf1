//! Built-in transition implementations.
//!
//! Each function takes a progress strictly inside (0, 1); endpoints are
//! handled by [`crate::transition::blend`].

pub(crate) mod circle;
pub(crate) mod dissolve;
pub(crate) mod slide;
pub(crate) mod wipe;
pub(crate) mod zoom;
