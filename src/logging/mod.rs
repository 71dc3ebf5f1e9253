//! # Logging
//!
//! The engine logs through the `log` facade and never installs a logger
//! itself; binaries and tests choose the backend. Use the per-feature macros
//! from [`features`] so every message lands under a filterable target.

pub mod features;

pub use features::LogFeature;

/// Returns whether messages at `level` for `feature` would currently be
/// emitted. Useful to skip building expensive log arguments.
pub fn enabled(feature: LogFeature, level: log::Level) -> bool {
    log::log_enabled!(target: feature.target(), level)
}
