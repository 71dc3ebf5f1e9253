//! Feature-specific logging macros and utilities
//!
//! Each engine component logs under its own target so output can be filtered
//! per feature, e.g. `RUST_LOG=course_models::merge=debug`.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Record,
    Merge,
    Store,
    Fixture,
}

impl LogFeature {
    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Record => "course_models::record",
            LogFeature::Merge => "course_models::merge",
            LogFeature::Store => "course_models::store",
            LogFeature::Fixture => "course_models::fixture",
        }
    }

    pub fn all() -> [LogFeature; 4] {
        [
            LogFeature::Record,
            LogFeature::Merge,
            LogFeature::Store,
            LogFeature::Fixture,
        ]
    }
}

// Record-specific logging macros
#[macro_export]
macro_rules! log_record_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "course_models::record", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_record_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "course_models::record", $($arg)*)
    };
}

// Merge-specific logging macros
#[macro_export]
macro_rules! log_merge_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "course_models::merge", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_merge_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "course_models::merge", $($arg)*)
    };
}

// Store-specific logging macros
#[macro_export]
macro_rules! log_store_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "course_models::store", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_store_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "course_models::store", $($arg)*)
    };
}

// Fixture-specific logging macros
#[macro_export]
macro_rules! log_fixture_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "course_models::fixture", $($arg)*)
    };
}
