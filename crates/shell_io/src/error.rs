//! crates/shell_io/src/error.rs
//! Error taxonomy for remote shell channels.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`ChannelError`].
///
/// The front-end maps each class onto a different operator message, so the
/// classes mirror what an operator can act on: wrong credentials, an
/// unreachable device, or something else.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ChannelErrorKind {
    /// The device refused the offered credentials.
    Auth,
    /// The network connection could not be established or was lost.
    Transport,
    /// An operation did not complete within its deadline.
    Timeout,
    /// Anything else, such as protocol violations.
    Other,
}

/// Failure raised by a [`Connector`](crate::Connector), a
/// [`Connection`](crate::Connection) or a [`ShellChannel`](crate::ShellChannel).
#[derive(Debug, Error)]
pub enum ChannelError {
    /// Password authentication was rejected.
    #[error("authentication failed for {username}@{host}")]
    Auth {
        /// User name offered to the device.
        username: String,
        /// Host the connection targeted.
        host: String,
    },
    /// Socket-level failure.
    #[error("{context}: {source}")]
    Transport {
        /// What the channel was doing when the failure happened.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An operation exceeded its deadline.
    #[error("{operation} timed out after {}ms", after.as_millis())]
    Timeout {
        /// Name of the operation that timed out.
        operation: &'static str,
        /// Deadline that elapsed.
        after: Duration,
    },
    /// The peer violated the SSH protocol or rejected a channel request.
    #[error("ssh protocol error: {0}")]
    Protocol(String),
    /// The channel was already closed locally.
    ///
    /// Classified as a transport failure: a caller that closes the channel to
    /// abandon a session sees the next operation fail like a dropped link.
    #[error("channel is closed")]
    Closed,
}

impl ChannelError {
    /// Builds a [`ChannelError::Transport`] from a context string and I/O error.
    pub fn transport(context: impl Into<String>, source: io::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ChannelErrorKind {
        match self {
            Self::Auth { .. } => ChannelErrorKind::Auth,
            Self::Transport { .. } | Self::Closed => ChannelErrorKind::Transport,
            Self::Timeout { .. } => ChannelErrorKind::Timeout,
            Self::Protocol(_) => ChannelErrorKind::Other,
        }
    }

    /// Reports whether the device rejected the credentials.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Reports whether an operation ran out of time.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(feature = "embedded-ssh")]
impl From<russh::Error> for ChannelError {
    fn from(error: russh::Error) -> Self {
        match error {
            russh::Error::IO(source) => Self::transport("ssh transport failed", source),
            other => Self::Protocol(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn auth_error_names_user_and_host() {
        let error = ChannelError::Auth {
            username: "admin".to_owned(),
            host: "10.0.0.1".to_owned(),
        };
        assert_eq!(error.to_string(), "authentication failed for admin@10.0.0.1");
        assert!(error.is_auth());
        assert_eq!(error.kind(), ChannelErrorKind::Auth);
    }

    #[test]
    fn transport_error_exposes_source() {
        let error = ChannelError::transport(
            "failed to connect to 10.0.0.1:22",
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        );
        assert_eq!(error.to_string(), "failed to connect to 10.0.0.1:22: refused");
        assert!(error.source().is_some());
        assert_eq!(error.kind(), ChannelErrorKind::Transport);
    }

    #[test]
    fn timeout_error_renders_milliseconds() {
        let error = ChannelError::Timeout {
            operation: "connect",
            after: Duration::from_secs(3),
        };
        assert_eq!(error.to_string(), "connect timed out after 3000ms");
        assert!(error.is_timeout());
        assert!(!error.is_auth());
    }

    #[test]
    fn closed_is_transport_and_protocol_is_other() {
        assert_eq!(ChannelError::Closed.kind(), ChannelErrorKind::Transport);
        assert_eq!(
            ChannelError::Protocol("bad packet".to_owned()).kind(),
            ChannelErrorKind::Other
        );
        assert_eq!(ChannelError::Closed.to_string(), "channel is closed");
    }
}
