//! crates/session/src/error.rs

use shell_io::{ChannelError, ChannelErrorKind};
use thiserror::Error;

use crate::state::SessionState;

/// A session that ended in `FAILED`.
#[derive(Debug, Error)]
#[error("session failed while {state}: {cause}")]
pub struct SessionError {
    state: SessionState,
    #[source]
    cause: ChannelError,
}

impl SessionError {
    pub(crate) const fn new(state: SessionState, cause: ChannelError) -> Self {
        Self { state, cause }
    }

    /// State that was active when the failure happened.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Channel failure that ended the session.
    #[must_use]
    pub const fn cause(&self) -> &ChannelError {
        &self.cause
    }

    /// Classification of the underlying failure.
    #[must_use]
    pub const fn kind(&self) -> ChannelErrorKind {
        self.cause.kind()
    }

    /// Consumes the error and returns the channel failure.
    #[must_use]
    pub fn into_cause(self) -> ChannelError {
        self.cause
    }
}
