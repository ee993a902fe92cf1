//! Integration test crate for snapcut.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on every snapcut crate to verify they work together.

#[cfg(test)]
mod grading;

#[cfg(test)]
mod keying;

#[cfg(test)]
mod render;

#[cfg(test)]
mod timeline;

/// Route `tracing` output to the test harness. Filtered by `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
