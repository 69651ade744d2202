//! crates/test-support/src/scripted.rs
//! In-memory stand-ins for the SSH connector and shell channel.
//!
//! A [`ScriptedConnector`] behaves like a device whose replies are fixed in
//! advance: the n-th [`send`](ShellChannel::send) makes the n-th scripted reply
//! readable, and [`receive`](ShellChannel::receive) hands out queued bytes up to
//! the requested limit without waiting. Everything the code under test does is
//! recorded in a shared [`Transcript`] that stays inspectable after the channel
//! has been consumed.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use shell_io::{ChannelError, Connection, Connector, ReceiveBuffer, ShellChannel};

/// A failure to inject into a scripted session.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Failure {
    /// Credentials rejected.
    Auth,
    /// Socket-level failure of the given kind.
    Transport(io::ErrorKind),
    /// Deadline exceeded.
    Timeout,
    /// Peer protocol error.
    Protocol,
}

impl Failure {
    fn to_error(self, host: &str, username: &str) -> ChannelError {
        match self {
            Self::Auth => ChannelError::Auth {
                username: username.to_owned(),
                host: host.to_owned(),
            },
            Self::Transport(kind) => {
                ChannelError::transport(format!("scripted failure talking to {host}"), kind.into())
            }
            Self::Timeout => ChannelError::Timeout {
                operation: "scripted",
                after: Duration::ZERO,
            },
            Self::Protocol => ChannelError::Protocol("scripted protocol failure".to_owned()),
        }
    }
}

/// Credentials and endpoint offered to [`ScriptedConnector::connect`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectAttempt {
    /// Target host.
    pub host: String,
    /// Target port.
    pub port: u16,
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: String,
}

#[derive(Debug, Default)]
struct Record {
    connects: Vec<ConnectAttempt>,
    shells_opened: usize,
    sent: Vec<Vec<u8>>,
    receive_limits: Vec<usize>,
    close_calls: usize,
}

/// Shared log of everything a scripted session observed.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    inner: Arc<Mutex<Record>>,
}

impl Transcript {
    fn lock(&self) -> MutexGuard<'_, Record> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Every connection attempt, in order.
    pub fn connects(&self) -> Vec<ConnectAttempt> {
        self.lock().connects.clone()
    }

    /// Number of shells that were opened successfully.
    pub fn shells_opened(&self) -> usize {
        self.lock().shells_opened
    }

    /// Raw payloads of every successful send.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    /// Successful sends decoded as UTF-8 (lossily).
    pub fn sent_text(&self) -> Vec<String> {
        self.lock()
            .sent
            .iter()
            .map(|payload| String::from_utf8_lossy(payload).into_owned())
            .collect()
    }

    /// Reports whether any successful send equals `payload`.
    pub fn was_sent(&self, payload: &str) -> bool {
        self.lock().sent.iter().any(|sent| sent == payload.as_bytes())
    }

    /// The `max_bytes` argument of every receive call, in order.
    pub fn receive_limits(&self) -> Vec<usize> {
        self.lock().receive_limits.clone()
    }

    /// Number of times `close` was invoked, including the implicit close on drop.
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }
}

/// Connector whose sessions replay a fixed script.
///
/// ```
/// use std::time::Duration;
/// use shell_io::{Connection, Connector, ShellChannel};
/// use test_support::ScriptedConnector;
///
/// let connector = ScriptedConnector::new()
///     .with_banner("Router>")
///     .reply("Password: ");
/// let transcript = connector.transcript();
///
/// let mut shell = connector
///     .connect("10.0.0.1", 22, "admin", "pw")?
///     .open_shell()?;
/// assert_eq!(shell.receive(100, Duration::ZERO)?, b"Router>");
/// shell.send(b"enable\n")?;
/// assert_eq!(shell.receive(100, Duration::ZERO)?, b"Password: ");
/// shell.close();
///
/// assert_eq!(transcript.sent_text(), ["enable\n"]);
/// assert_eq!(transcript.close_calls(), 1);
/// # Ok::<(), shell_io::ChannelError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedConnector {
    banner: Vec<u8>,
    replies: Vec<Vec<u8>>,
    connect_failure: Option<Failure>,
    open_failure: Option<Failure>,
    send_failures: Vec<(usize, Failure)>,
    receive_failures: Vec<(usize, Failure)>,
    transcript: Transcript,
}

impl ScriptedConnector {
    /// Creates a connector whose device prints nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Output available before the first send.
    pub fn with_banner(mut self, banner: impl AsRef<[u8]>) -> Self {
        self.banner = banner.as_ref().to_vec();
        self
    }

    /// Appends the reply made readable by the next unanswered send.
    pub fn reply(mut self, output: impl AsRef<[u8]>) -> Self {
        self.replies.push(output.as_ref().to_vec());
        self
    }

    /// Appends a send that produces no output.
    pub fn silent(self) -> Self {
        self.reply([])
    }

    /// Fails [`connect`](Connector::connect) with `failure`.
    pub fn fail_connect(mut self, failure: Failure) -> Self {
        self.connect_failure = Some(failure);
        self
    }

    /// Fails [`open_shell`](Connection::open_shell) with `failure`.
    pub fn fail_open_shell(mut self, failure: Failure) -> Self {
        self.open_failure = Some(failure);
        self
    }

    /// Fails the send with zero-based index `index` with `failure`.
    ///
    /// The failed payload is not recorded as sent.
    pub fn fail_send(mut self, index: usize, failure: Failure) -> Self {
        self.send_failures.push((index, failure));
        self
    }

    /// Fails the receive call with zero-based index `index` with `failure`.
    pub fn fail_receive(mut self, index: usize, failure: Failure) -> Self {
        self.receive_failures.push((index, failure));
        self
    }

    /// Handle on the shared transcript.
    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }
}

impl Connector for ScriptedConnector {
    type Connection = ScriptedConnection;

    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self::Connection, ChannelError> {
        self.transcript.lock().connects.push(ConnectAttempt {
            host: host.to_owned(),
            port,
            username: username.to_owned(),
            password: password.to_owned(),
        });
        if let Some(failure) = self.connect_failure {
            return Err(failure.to_error(host, username));
        }
        Ok(ScriptedConnection {
            host: host.to_owned(),
            username: username.to_owned(),
            script: self.clone(),
        })
    }
}

/// Authenticated scripted session.
#[derive(Debug)]
pub struct ScriptedConnection {
    host: String,
    username: String,
    script: ScriptedConnector,
}

impl Connection for ScriptedConnection {
    type Shell = ScriptedChannel;

    fn open_shell(self) -> Result<Self::Shell, ChannelError> {
        if let Some(failure) = self.script.open_failure {
            return Err(failure.to_error(&self.host, &self.username));
        }
        self.script.transcript.lock().shells_opened += 1;

        let mut pending = ReceiveBuffer::default();
        pending.extend(&self.script.banner);
        Ok(ScriptedChannel {
            host: self.host,
            username: self.username,
            pending,
            replies: self.script.replies.into(),
            send_failures: self.script.send_failures,
            receive_failures: self.script.receive_failures,
            sends: 0,
            receives: 0,
            closed: false,
            transcript: self.script.transcript,
        })
    }
}

/// Scripted interactive shell.
#[derive(Debug)]
pub struct ScriptedChannel {
    host: String,
    username: String,
    pending: ReceiveBuffer,
    replies: VecDeque<Vec<u8>>,
    send_failures: Vec<(usize, Failure)>,
    receive_failures: Vec<(usize, Failure)>,
    sends: usize,
    receives: usize,
    closed: bool,
    transcript: Transcript,
}

impl ScriptedChannel {
    fn injected(failures: &[(usize, Failure)], index: usize) -> Option<Failure> {
        failures
            .iter()
            .find(|(at, _)| *at == index)
            .map(|(_, failure)| *failure)
    }
}

impl ShellChannel for ScriptedChannel {
    fn send(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        let index = self.sends;
        self.sends += 1;
        if let Some(failure) = Self::injected(&self.send_failures, index) {
            return Err(failure.to_error(&self.host, &self.username));
        }
        self.transcript.lock().sent.push(data.to_vec());
        if let Some(reply) = self.replies.pop_front() {
            self.pending.extend(&reply);
        }
        Ok(())
    }

    fn receive(&mut self, max_bytes: usize, _timeout: Duration) -> Result<Vec<u8>, ChannelError> {
        if self.closed {
            return Err(ChannelError::Closed);
        }
        let index = self.receives;
        self.receives += 1;
        self.transcript.lock().receive_limits.push(max_bytes);
        if let Some(failure) = Self::injected(&self.receive_failures, index) {
            return Err(failure.to_error(&self.host, &self.username));
        }
        Ok(self.pending.take(max_bytes))
    }

    fn close(&mut self) {
        self.transcript.lock().close_calls += 1;
        self.closed = true;
        self.pending.clear();
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for ScriptedChannel {
    fn drop(&mut self) {
        if !self.closed {
            self.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_follow_sends() {
        let connector = ScriptedConnector::new().reply("one").silent().reply("three");
        let mut shell = connector
            .connect("h", 22, "u", "p")
            .and_then(Connection::open_shell)
            .expect("scripted shell");

        assert!(shell.receive(10, Duration::ZERO).expect("rx").is_empty());
        shell.send(b"a").expect("send");
        assert_eq!(shell.receive(10, Duration::ZERO).expect("rx"), b"one");
        shell.send(b"b").expect("send");
        assert!(shell.receive(10, Duration::ZERO).expect("rx").is_empty());
        shell.send(b"c").expect("send");
        assert_eq!(shell.receive(2, Duration::ZERO).expect("rx"), b"th");
        assert_eq!(shell.receive(10, Duration::ZERO).expect("rx"), b"ree");
    }

    #[test]
    fn injected_send_failure_is_not_recorded() {
        let connector = ScriptedConnector::new().fail_send(1, Failure::Auth);
        let transcript = connector.transcript();
        let mut shell = connector
            .connect("10.0.0.1", 22, "admin", "p")
            .and_then(Connection::open_shell)
            .expect("scripted shell");

        shell.send(b"enable\n").expect("first send");
        let error = shell.send(b"secret\n").expect_err("second send fails");
        assert!(error.is_auth());
        assert_eq!(transcript.sent_text(), ["enable\n"]);
    }

    #[test]
    fn connect_failure_is_recorded() {
        let connector =
            ScriptedConnector::new().fail_connect(Failure::Transport(io::ErrorKind::TimedOut));
        let transcript = connector.transcript();
        let error = connector
            .connect("10.0.0.9", 2222, "admin", "p")
            .expect_err("connect fails");
        assert!(!error.is_auth());
        assert_eq!(transcript.connects()[0].port, 2222);
        assert_eq!(transcript.shells_opened(), 0);
    }

    #[test]
    fn closed_channel_rejects_io_and_drop_does_not_double_close() {
        let connector = ScriptedConnector::new();
        let transcript = connector.transcript();
        let mut shell = connector
            .connect("h", 22, "u", "p")
            .and_then(Connection::open_shell)
            .expect("scripted shell");

        shell.close();
        assert!(shell.is_closed());
        assert!(matches!(shell.send(b"x"), Err(ChannelError::Closed)));
        assert!(matches!(
            shell.receive(1, Duration::ZERO),
            Err(ChannelError::Closed)
        ));
        drop(shell);
        assert_eq!(transcript.close_calls(), 1);
    }
}
