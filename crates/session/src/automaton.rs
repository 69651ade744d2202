//! crates/session/src/automaton.rs
//! The capture state machine.
//!
//! The device CLI offers no response framing, so the automaton never parses
//! prompts. After each command it waits a fixed quiescence interval and then
//! drains whatever the device printed (settle-and-drain). The capture itself is
//! a single bounded read after a longer interval; output that does not fit in
//! that window or under the cap is silently truncated.

use std::thread;
use std::time::Duration;

use logging::{trace_cmd, trace_io, trace_session, trace_timing};
use shell_io::{ChannelError, Connection, Connector, ShellChannel};
use time::OffsetDateTime;
use zeroize::Zeroizing;

use crate::capture::CaptureResult;
use crate::config::SessionConfig;
use crate::credentials::{Credentials, Target};
use crate::error::SessionError;
use crate::state::{SessionState, SessionTrace};

/// How a command is echoed to the `cfgvault::cmd` trace.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Echo {
    Plain,
    Redacted,
}

/// Drives one device through
/// `CONNECTING → AUTHENTICATING_PRIVILEGE → DISABLING_PAGINATION → CAPTURING → DONE`,
/// or into `FAILED` from any of them.
///
/// The automaton owns the channel exclusively and consumes itself when run,
/// so a channel can never be reused after the session ends. The channel is
/// closed on every path.
///
/// ```
/// use session::{Credentials, SessionAutomaton, SessionConfig, Target};
/// use test_support::ScriptedConnector;
///
/// let connector = ScriptedConnector::new()
///     .reply("Password: ")
///     .reply("R1#")
///     .reply("R1#")
///     .reply("hostname R1\r\nend\r\n");
///
/// let capture = SessionAutomaton::new(
///     connector,
///     Target::new("10.0.0.1", 22),
///     Credentials::new("admin", "pw", "secret"),
///     SessionConfig::default().immediate(),
/// )
/// .run()?;
/// assert_eq!(capture.text(), "hostname R1\r\nend\r\n");
/// # Ok::<(), session::SessionError>(())
/// ```
pub struct SessionAutomaton<C> {
    connector: C,
    target: Target,
    credentials: Credentials,
    config: SessionConfig,
    trace: SessionTrace,
}

impl<C> SessionAutomaton<C>
where
    C: Connector,
{
    /// Prepares a session; nothing touches the network until [`run`](Self::run).
    pub fn new(
        connector: C,
        target: Target,
        credentials: Credentials,
        config: SessionConfig,
    ) -> Self {
        Self {
            connector,
            target,
            credentials,
            config,
            trace: SessionTrace::default(),
        }
    }

    /// Runs the session to a terminal state.
    pub fn run(self) -> Result<CaptureResult, SessionError> {
        self.run_traced().0
    }

    /// Runs the session and also returns the states it passed through.
    pub fn run_traced(mut self) -> (Result<CaptureResult, SessionError>, SessionTrace) {
        let outcome = self.drive();
        (outcome, self.trace)
    }

    fn drive(&mut self) -> Result<CaptureResult, SessionError> {
        self.enter(SessionState::Connecting);
        let mut shell = match self.open_shell() {
            Ok(shell) => shell,
            Err(cause) => return Err(self.fail(cause)),
        };

        let outcome = self.converse(&mut shell);
        match outcome {
            Ok(capture) => {
                self.enter(SessionState::Done);
                let terminate = self.config.commands().terminate.clone();
                if let Err(error) = self.send_line(&mut shell, &terminate, Echo::Plain) {
                    trace_cmd!("ignoring failed terminate command: {}", error);
                }
                shell.close();
                Ok(capture)
            }
            Err(cause) => {
                shell.close();
                Err(self.fail(cause))
            }
        }
    }

    fn open_shell(
        &self,
    ) -> Result<<C::Connection as Connection>::Shell, ChannelError> {
        let connection = self.connector.connect(
            &self.target.host,
            self.target.port,
            &self.credentials.username,
            self.credentials.password.expose(),
        )?;
        connection.open_shell()
    }

    fn converse<S>(&mut self, shell: &mut S) -> Result<CaptureResult, ChannelError>
    where
        S: ShellChannel,
    {
        let commands = self.config.commands().clone();

        self.enter(SessionState::AuthenticatingPrivilege);
        self.send_line(shell, &commands.enable, Echo::Plain)?;
        self.settle_and_drain(shell)?;
        let secret = self.credentials.enable_secret.clone();
        self.send_line(shell, secret.expose(), Echo::Redacted)?;
        self.settle_and_drain(shell)?;

        self.enter(SessionState::DisablingPagination);
        self.send_line(shell, &commands.pager_off, Echo::Plain)?;
        self.settle_and_drain(shell)?;

        self.enter(SessionState::Capturing);
        self.send_line(shell, &commands.capture, Echo::Plain)?;
        pause(self.config.capture_wait());
        let raw = shell.receive(self.config.capture_limit(), self.config.read_timeout())?;
        trace_io!(
            "captured {} bytes (cap {})",
            raw.len(),
            self.config.capture_limit()
        );
        Ok(CaptureResult::from_bytes(&raw, OffsetDateTime::now_utc()))
    }

    fn send_line<S>(&self, shell: &mut S, text: &str, echo: Echo) -> Result<(), ChannelError>
    where
        S: ShellChannel,
    {
        match echo {
            Echo::Plain => trace_cmd!("{} <- {:?}", self.target.host, text),
            Echo::Redacted => trace_cmd!("{} <- \"********\"", self.target.host),
        }
        let mut line = Zeroizing::new(String::with_capacity(text.len() + 1));
        line.push_str(text);
        line.push('\n');
        shell.send(line.as_bytes())
    }

    fn settle_and_drain<S>(&self, shell: &mut S) -> Result<(), ChannelError>
    where
        S: ShellChannel,
    {
        pause(self.config.settle());
        let discarded = shell.receive(self.config.drain_limit(), self.config.read_timeout())?;
        trace_io!("drained {} bytes of prompt output", discarded.len());
        Ok(())
    }

    fn enter(&mut self, state: SessionState) {
        match self.trace.last() {
            Some(previous) => trace_session!("{}: {} -> {}", self.target, previous, state),
            None => trace_session!("{}: {}", self.target, state),
        }
        self.trace.enter(state);
    }

    fn fail(&mut self, cause: ChannelError) -> SessionError {
        let state = self.trace.last().unwrap_or(SessionState::Connecting);
        tracing::warn!(
            target: "cfgvault::session",
            "{}: failed while {}: {}",
            self.target,
            state,
            cause
        );
        self.enter(SessionState::Failed);
        SessionError::new(state, cause)
    }
}

fn pause(interval: Duration) {
    if interval.is_zero() {
        return;
    }
    trace_timing!("settling for {:?}", interval);
    thread::sleep(interval);
}
