//! crates/shell_io/src/unsupported.rs
//! Connector used when the crate is built without an SSH client.

use std::io;
use std::time::Duration;

use crate::channel::{Connection, Connector, ShellChannel};
use crate::error::ChannelError;

/// A [`Connector`] that fails every connection attempt with a transport error.
///
/// Builds without the `embedded-ssh` feature use it so that the rest of the
/// pipeline still links and reports a clear diagnostic.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedConnector;

/// Uninhabited connection type of [`UnsupportedConnector`].
#[derive(Debug)]
pub enum NoConnection {}

impl Connector for UnsupportedConnector {
    type Connection = NoConnection;

    fn connect(
        &self,
        host: &str,
        port: u16,
        _username: &str,
        _password: &str,
    ) -> Result<Self::Connection, ChannelError> {
        Err(ChannelError::transport(
            format!("cannot connect to {host}:{port}"),
            io::Error::new(
                io::ErrorKind::Unsupported,
                "built without the embedded-ssh feature",
            ),
        ))
    }
}

impl Connection for NoConnection {
    type Shell = Self;

    fn open_shell(self) -> Result<Self::Shell, ChannelError> {
        match self {}
    }
}

impl ShellChannel for NoConnection {
    fn send(&mut self, _data: &[u8]) -> Result<(), ChannelError> {
        match *self {}
    }

    fn receive(&mut self, _max_bytes: usize, _timeout: Duration) -> Result<Vec<u8>, ChannelError> {
        match *self {}
    }

    fn close(&mut self) {
        match *self {}
    }

    fn is_closed(&self) -> bool {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChannelErrorKind;

    #[test]
    fn every_attempt_is_a_transport_failure() {
        let error = UnsupportedConnector
            .connect("10.0.0.1", 22, "admin", "pw")
            .expect_err("no ssh client");
        assert_eq!(error.kind(), ChannelErrorKind::Transport);
        assert!(error.to_string().contains("10.0.0.1:22"));
    }
}
