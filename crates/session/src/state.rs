//! crates/session/src/state.rs
//! Automaton states and the transition history.

use std::fmt;

/// Phase of a capture session.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SessionState {
    /// Opening the transport, authenticating and requesting a shell.
    Connecting,
    /// Sending the escalation command and secret.
    AuthenticatingPrivilege,
    /// Turning off the CLI pager.
    DisablingPagination,
    /// Issuing the capture command and reading its output.
    Capturing,
    /// Capture finished; the channel has been released.
    Done,
    /// A step failed; the channel has been released.
    Failed,
}

impl SessionState {
    /// Upper-case name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Connecting => "CONNECTING",
            Self::AuthenticatingPrivilege => "AUTHENTICATING_PRIVILEGE",
            Self::DisablingPagination => "DISABLING_PAGINATION",
            Self::Capturing => "CAPTURING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// Reports whether the state ends the session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of the states a session passed through.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SessionTrace {
    states: Vec<SessionState>,
}

impl SessionTrace {
    pub(crate) fn enter(&mut self, state: SessionState) {
        self.states.push(state);
    }

    /// Visited states, in order.
    #[must_use]
    pub fn states(&self) -> &[SessionState] {
        &self.states
    }

    /// Last state entered, if any.
    #[must_use]
    pub fn last(&self) -> Option<SessionState> {
        self.states.last().copied()
    }

    /// Reports whether `state` was ever entered.
    #[must_use]
    pub fn visited(&self, state: SessionState) -> bool {
        self.states.contains(&state)
    }
}

impl fmt::Display for SessionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, state) in self.states.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(state.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_upper_case() {
        assert_eq!(
            SessionState::AuthenticatingPrivilege.to_string(),
            "AUTHENTICATING_PRIVILEGE"
        );
        assert_eq!(SessionState::Done.to_string(), "DONE");
    }

    #[test]
    fn only_done_and_failed_are_terminal() {
        assert!(SessionState::Done.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Capturing.is_terminal());
    }

    #[test]
    fn trace_renders_arrows() {
        let mut trace = SessionTrace::default();
        trace.enter(SessionState::Connecting);
        trace.enter(SessionState::Failed);
        assert_eq!(trace.to_string(), "CONNECTING -> FAILED");
        assert_eq!(trace.last(), Some(SessionState::Failed));
        assert!(!trace.visited(SessionState::Capturing));
    }
}
