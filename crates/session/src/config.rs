//! crates/session/src/config.rs
//! Timing and command tunables for the session automaton.

use std::time::Duration;

/// Commands written to the device CLI, without line terminators.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandSet {
    /// Privilege-escalation command.
    pub enable: String,
    /// Command that disables output pagination.
    pub pager_off: String,
    /// Command that prints the running configuration.
    pub capture: String,
    /// Command sent before releasing the channel.
    pub terminate: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            enable: "enable".to_owned(),
            pager_off: "term len 0".to_owned(),
            capture: "show running-config".to_owned(),
            terminate: "end".to_owned(),
        }
    }
}

/// Settle intervals, read caps and commands used by
/// [`SessionAutomaton`](crate::SessionAutomaton).
///
/// ```
/// use std::time::Duration;
/// use session::SessionConfig;
///
/// let config = SessionConfig::default()
///     .with_settle(Duration::from_millis(250))
///     .with_capture_limit(4096);
/// assert_eq!(config.settle(), Duration::from_millis(250));
/// assert_eq!(config.capture_wait(), Duration::from_secs(2));
/// assert_eq!(config.capture_limit(), 4096);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    settle: Duration,
    capture_wait: Duration,
    drain_limit: usize,
    capture_limit: usize,
    read_timeout: Duration,
    commands: CommandSet,
}

impl SessionConfig {
    /// Quiescence interval after each short command.
    pub const DEFAULT_SETTLE: Duration = Duration::from_millis(500);
    /// Quiescence interval after the capture command.
    pub const DEFAULT_CAPTURE_WAIT: Duration = Duration::from_secs(2);
    /// Cap on the bytes discarded by one drain.
    pub const DEFAULT_DRAIN_LIMIT: usize = 99_999;
    /// Cap on the captured configuration.
    pub const DEFAULT_CAPTURE_LIMIT: usize = 999_999;
    /// Bound on each individual receive call.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

    /// Sets the quiescence interval after escalation and pager commands.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Sets the quiescence interval before the capture read.
    pub fn with_capture_wait(mut self, wait: Duration) -> Self {
        self.capture_wait = wait;
        self
    }

    /// Sets the cap on drained bytes.
    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit;
        self
    }

    /// Sets the cap on captured bytes.
    pub fn with_capture_limit(mut self, limit: usize) -> Self {
        self.capture_limit = limit;
        self
    }

    /// Sets the bound on each receive call.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Replaces the command set.
    pub fn with_commands(mut self, commands: CommandSet) -> Self {
        self.commands = commands;
        self
    }

    /// Collapses every delay to zero; used by tests against scripted channels.
    pub fn immediate(self) -> Self {
        self.with_settle(Duration::ZERO)
            .with_capture_wait(Duration::ZERO)
            .with_read_timeout(Duration::ZERO)
    }

    /// Quiescence interval after short commands.
    pub const fn settle(&self) -> Duration {
        self.settle
    }

    /// Quiescence interval before the capture read.
    pub const fn capture_wait(&self) -> Duration {
        self.capture_wait
    }

    /// Cap on drained bytes.
    pub const fn drain_limit(&self) -> usize {
        self.drain_limit
    }

    /// Cap on captured bytes.
    pub const fn capture_limit(&self) -> usize {
        self.capture_limit
    }

    /// Bound on each receive call.
    pub const fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Commands written to the device.
    pub const fn commands(&self) -> &CommandSet {
        &self.commands
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle: Self::DEFAULT_SETTLE,
            capture_wait: Self::DEFAULT_CAPTURE_WAIT,
            drain_limit: Self::DEFAULT_DRAIN_LIMIT,
            capture_limit: Self::DEFAULT_CAPTURE_LIMIT,
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
            commands: CommandSet::default(),
        }
    }
}
