#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` carries the two output channels of a cfgvault run:
//!
//! - **Status lines** ([`Status`], [`StatusSink`]): the `[+]`/`[-]`/`[✓]`/`[!]`
//!   lines an operator (or a cron mail) reads. They are always emitted.
//! - **Diagnostics**: `tracing` events on `cfgvault::*` targets, filtered by a
//!   per-category [`VerbosityConfig`] and collected in a thread-local buffer
//!   that the front-end drains with [`drain_events`] and prints to stderr.
//!
//! # Design
//!
//! Verbosity is expressed as levels on a small set of info flags (connect,
//! session, archive, prune) and debug flags (connect, cmd, io, timing). The
//! `-v` count maps onto those flags through
//! [`VerbosityConfig::from_verbose_level`]. With the `tracing` feature enabled
//! the crate provides [`VerbosityLayer`], a `tracing-subscriber` layer that
//! routes events into the buffer, and [`init_tracing`] to install it.
//!
//! # Examples
//!
//! ```
//! use logging::{DebugFlag, VerbosityConfig, debug_gte, init};
//!
//! init(VerbosityConfig::from_verbose_level(2));
//! assert!(debug_gte(DebugFlag::Cmd, 1));
//! assert!(!debug_gte(DebugFlag::Io, 1));
//! ```

mod config;
mod levels;
mod status;
mod thread_local;
mod tracing_macros;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use status::{Status, StatusKind, StatusSink};
pub use thread_local::{
    DiagnosticEvent, debug_gte, drain_events, emit_debug, emit_info, info_gte, init,
};

#[cfg(feature = "tracing")]
pub use tracing_bridge::{VerbosityLayer, init_tracing};
