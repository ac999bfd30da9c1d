//! Stage logging macros
//!
//! Each pipeline stage reports what it did under its own log target
//! (`audio_features::<stage>`). Debug builds forward to the `log` facade;
//! release builds expand to nothing so the per-sample loops stay free of
//! formatting work.

/// Stage debug logging - only active in debug builds
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! stage_debug {
    ($stage:literal, $($arg:tt)*) => {
        log::debug!(target: concat!("audio_features::", $stage), $($arg)*)
    };
}

/// Stage debug logging - no-op in release builds
#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! stage_debug {
    ($stage:literal, $($arg:tt)*) => {};
}

/// Stage trace logging - only active in debug builds
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! stage_trace {
    ($stage:literal, $($arg:tt)*) => {
        log::trace!(target: concat!("audio_features::", $stage), $($arg)*)
    };
}

/// Stage trace logging - no-op in release builds
#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! stage_trace {
    ($stage:literal, $($arg:tt)*) => {};
}
