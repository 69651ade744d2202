//! crates/logging/src/tracing_macros.rs
//! Convenience macros that pin tracing events to the cfgvault targets
//! understood by [`VerbosityLayer`](crate::VerbosityLayer).

/// Emit a connection progress trace.
///
/// ```ignore
/// trace_connect!("opening shell on {}", host);
/// ```
#[macro_export]
macro_rules! trace_connect {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgvault::connect", $($arg)*)
    };
}

/// Emit a session state transition trace.
#[macro_export]
macro_rules! trace_session {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgvault::session", $($arg)*)
    };
}

/// Emit an archive write trace.
#[macro_export]
macro_rules! trace_archive {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgvault::archive", $($arg)*)
    };
}

/// Emit a retention pruning trace.
#[macro_export]
macro_rules! trace_prune {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "cfgvault::prune", $($arg)*)
    };
}

/// Emit a trace for a command written to the remote shell.
#[macro_export]
macro_rules! trace_cmd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "cfgvault::cmd", $($arg)*)
    };
}

/// Emit a channel I/O trace.
#[macro_export]
macro_rules! trace_io {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "cfgvault::io", $($arg)*)
    };
}

/// Emit a settle/quiescence timing trace.
#[macro_export]
macro_rules! trace_timing {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "cfgvault::timing", $($arg)*)
    };
}

/// Emit a transport-level trace.
#[macro_export]
macro_rules! trace_transport {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "cfgvault::transport", $($arg)*)
    };
}
