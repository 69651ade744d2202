#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `shell_io` abstracts the interactive remote shell a backup session talks
//! to. The [`Connector`] → [`Connection`] → [`ShellChannel`] chain separates
//! authentication from shell allocation so that callers can tell a rejected
//! password apart from a device that accepted the login but refused a shell.
//!
//! # Design
//!
//! - [`ShellChannel::receive`] is *bounded* and *non-blocking past the first
//!   chunk*: it waits for output up to a timeout, then returns whatever is
//!   already queued, never more than the requested size. Surplus bytes stay in
//!   a [`ReceiveBuffer`] for the next call.
//! - Closing is idempotent and also happens on drop.
//! - Failures are reported as [`ChannelError`], whose [`ChannelErrorKind`]
//!   separates authentication, transport and timeout problems.
//!
//! With the `embedded-ssh` feature the crate provides [`SshConnector`], an
//! in-process SSH client driven by a private tokio runtime. Without it,
//! [`UnsupportedConnector`] fails every attempt with a transport error.
//!
//! # Examples
//!
//! ```
//! use shell_io::{ChannelErrorKind, Connector, UnsupportedConnector};
//!
//! let error = UnsupportedConnector
//!     .connect("192.0.2.1", 22, "admin", "secret")
//!     .unwrap_err();
//! assert_eq!(error.kind(), ChannelErrorKind::Transport);
//! ```

mod buffer;
mod channel;
mod error;
mod unsupported;

#[cfg(feature = "embedded-ssh")]
mod ssh;

pub use buffer::ReceiveBuffer;
pub use channel::{Connection, Connector, ShellChannel};
pub use error::{ChannelError, ChannelErrorKind};
pub use unsupported::{NoConnection, UnsupportedConnector};

#[cfg(feature = "embedded-ssh")]
pub use ssh::{DEFAULT_CONNECT_TIMEOUT, HostKeyPolicy, SshConnection, SshConnector, SshShell};
