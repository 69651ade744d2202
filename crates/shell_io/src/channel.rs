//! crates/shell_io/src/channel.rs
//! Traits describing an interactive remote shell.
//!
//! Connecting is split into two steps so that authentication failures are
//! reported before any shell is requested: a [`Connector`] yields an
//! authenticated [`Connection`], which is then consumed to open a
//! [`ShellChannel`].

use std::time::Duration;

use crate::error::ChannelError;

/// Establishes authenticated sessions with remote devices.
pub trait Connector {
    /// Authenticated session produced by [`connect`](Self::connect).
    type Connection: Connection;

    /// Opens a transport to `host:port` and authenticates with a password.
    ///
    /// Rejected credentials surface as [`ChannelError::Auth`]; unreachable
    /// hosts as [`ChannelError::Transport`] or [`ChannelError::Timeout`].
    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self::Connection, ChannelError>;
}

/// An authenticated session that can host one interactive shell.
pub trait Connection {
    /// Shell channel produced by [`open_shell`](Self::open_shell).
    type Shell: ShellChannel;

    /// Requests a pseudo-terminal and an interactive shell.
    fn open_shell(self) -> Result<Self::Shell, ChannelError>;
}

/// A bidirectional byte stream to an interactive remote shell.
///
/// Implementations must make [`close`](Self::close) idempotent and must
/// release the transport when dropped without an explicit close.
pub trait ShellChannel {
    /// Writes `data` to the remote shell.
    fn send(&mut self, data: &[u8]) -> Result<(), ChannelError>;

    /// Reads whatever the shell has produced, up to `max_bytes`.
    ///
    /// Waits at most `timeout` for the first bytes, then returns everything
    /// that is already queued without waiting further. Returns an empty vector
    /// when nothing arrived in time. Bytes beyond `max_bytes` stay buffered for
    /// the next call.
    fn receive(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, ChannelError>;

    /// Closes the shell and the session beneath it.
    ///
    /// After closing, [`send`](Self::send) and [`receive`](Self::receive)
    /// return [`ChannelError::Closed`].
    fn close(&mut self);

    /// Reports whether [`close`](Self::close) has run.
    fn is_closed(&self) -> bool;
}

impl<S: ShellChannel + ?Sized> ShellChannel for Box<S> {
    fn send(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        (**self).send(data)
    }

    fn receive(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, ChannelError> {
        (**self).receive(max_bytes, timeout)
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}
