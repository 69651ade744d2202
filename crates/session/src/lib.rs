#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `session` captures a network device's running configuration through an
//! interactive CLI. [`SessionAutomaton`] connects with a
//! [`shell_io::Connector`], escalates privilege, disables the pager, issues
//! the capture command and returns a [`CaptureResult`].
//!
//! # Design
//!
//! The automaton walks the states of [`SessionState`] strictly in order.
//! Timing is the only synchronization: every command is followed by a fixed
//! settle interval and a bounded drain, and the capture is one bounded read
//! after a longer interval. Intervals, caps and command strings live in
//! [`SessionConfig`].
//!
//! Failures at any step end the session in `FAILED` and surface as a
//! [`SessionError`] naming the state and the [`shell_io::ChannelError`] that
//! caused it. An empty capture is not a failure.
//!
//! # Invariants
//!
//! - The channel is closed on every path out of [`SessionAutomaton::run`].
//! - The capture command is never sent unless escalation and pager commands
//!   were written successfully.
//! - The escalation secret never appears in traces or `Debug` output.

mod automaton;
mod capture;
mod config;
mod credentials;
mod error;
mod state;

pub use automaton::SessionAutomaton;
pub use capture::CaptureResult;
pub use config::{CommandSet, SessionConfig};
pub use credentials::{Credentials, Secret, Target};
pub use error::SessionError;
pub use state::{SessionState, SessionTrace};
