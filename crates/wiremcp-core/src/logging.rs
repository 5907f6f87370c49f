//! Structured logging for wiremcp.
//!
//! Built on the standard [`log`] facade. wiremcp does not ship a log
//! implementation; applications install their preferred backend
//! (`env_logger`, `simple_logger`, ...).
//!
//! # Log Levels
//!
//! - **warn**: Recovered wire anomalies (e.g. a non-object `_meta` that was dropped)
//! - **debug**: Decode failures about to be surfaced to the caller
//! - **trace**: Envelope conversions and per-message details
//!
//! # Log Targets
//!
//! - `wiremcp`: Root target for all wiremcp logs
//! - `wiremcp::codec`: Extensible params encode/decode
//! - `wiremcp::content`: Content variant dispatch
//! - `wiremcp::envelope`: Notification/request envelope conversions
//!
//! Example filter: `RUST_LOG=wiremcp::codec=debug`

// Re-export log macros for ergonomic use
pub use log::{debug, error, info, trace, warn};

// Re-export log level types for programmatic use
pub use log::{Level, LevelFilter};

/// Log targets used by wiremcp components.
pub mod targets {
    /// Root target for all wiremcp logs.
    pub const WIREMCP: &str = "wiremcp";

    /// Extensible params codec.
    pub const CODEC: &str = "wiremcp::codec";

    /// Content variant dispatch.
    pub const CONTENT: &str = "wiremcp::content";

    /// Notification and request envelopes.
    pub const ENVELOPE: &str = "wiremcp::envelope";
}

/// Returns whether logging is enabled at the given level for the given target.
#[inline]
#[must_use]
pub fn is_enabled(level: Level, target: &str) -> bool {
    log::log_enabled!(target: target, level)
}

/// Logs an envelope event at TRACE level.
#[macro_export]
macro_rules! log_envelope {
    ($($arg:tt)*) => {
        $crate::logging::trace!(target: $crate::logging::targets::ENVELOPE, $($arg)*)
    };
}
