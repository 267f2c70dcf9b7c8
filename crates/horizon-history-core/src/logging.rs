//! Logging and debugging facilities for Horizon History.
//!
//! This module provides:
//! - Integration with the `tracing` crate for structured logging
//! - Target and span name constants for filtering
//! - Performance tracing hooks for profiling
//!
//! # Tracing Integration
//!
//! Horizon History uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! use tracing_subscriber;
//!
//! fn main() {
//!     // Only show history navigation at debug level
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_history::navigator=debug")
//!         .init();
//!
//!     // Your application code...
//! }
//! ```

/// Span names used throughout Horizon History for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// Navigation replay span.
    pub const REPLAY: &str = "horizon_history::replay";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_history_core::signal";
    /// Performance spans target.
    pub const PERF: &str = "horizon_history::perf";
    /// History log target.
    pub const LOG: &str = "horizon_history::log";
    /// Navigator target.
    pub const NAVIGATOR: &str = "horizon_history::navigator";
    /// Monitor component target.
    pub const MONITOR: &str = "horizon_history::monitor";
}

/// A guard that emits a tracing span when dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with consistent
/// target naming for the monitor component.
#[macro_export]
macro_rules! history_trace {
    ($($arg:tt)*) => {
        $crate::tracing::trace!(target: "horizon_history::monitor", $($arg)*)
    };
}

#[macro_export]
macro_rules! history_debug {
    ($($arg:tt)*) => {
        $crate::tracing::debug!(target: "horizon_history::monitor", $($arg)*)
    };
}

#[macro_export]
macro_rules! history_warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: "horizon_history::monitor", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Without a subscriber the span is disabled but must still be usable
        let span = PerfSpan::new(span_names::REPLAY);
        drop(span);
    }

    #[test]
    fn test_perf_span_uses_perf_target() {
        use std::sync::Arc;

        use parking_lot::Mutex;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        struct SpanTargets(Arc<Mutex<Vec<&'static str>>>);

        impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for SpanTargets {
            fn on_new_span(
                &self,
                attrs: &tracing::span::Attributes<'_>,
                _id: &tracing::span::Id,
                _ctx: Context<'_, S>,
            ) {
                self.0.lock().push(attrs.metadata().target());
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(SpanTargets(seen.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::REPLAY);
        });

        assert_eq!(*seen.lock(), vec![targets::PERF]);
    }

    #[test]
    fn test_logging_macros_expand() {
        history_trace!(entries = 3, "trace");
        history_debug!(hash = "h1", "debug");
        history_warn!("warn");
    }

    #[test]
    fn test_targets_share_prefix() {
        for target in [targets::LOG, targets::NAVIGATOR, targets::MONITOR, targets::PERF] {
            assert!(target.starts_with("horizon_history::"));
        }
        assert!(targets::SIGNAL.starts_with("horizon_history_core::"));
    }
}
