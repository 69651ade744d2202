//! Authenticated SSH sessions and the interactive shell channel they host.

use std::time::{Duration, Instant};

use logging::{trace_io, trace_transport};
use russh::client::{Handle, Msg};
use russh::{Channel, ChannelMsg, Disconnect};
use tokio::runtime::Runtime;

use super::HostKeyCheck;
use crate::buffer::ReceiveBuffer;
use crate::channel::{Connection, ShellChannel};
use crate::error::ChannelError;

/// Terminal type requested for the shell's pseudo-terminal.
const TERMINAL: &str = "vt100";
const TERMINAL_COLUMNS: u32 = 80;
const TERMINAL_ROWS: u32 = 24;

/// An authenticated SSH session that has not opened a shell yet.
///
/// Dropping the value closes the TCP connection.
pub struct SshConnection {
    runtime: Runtime,
    handle: Handle<HostKeyCheck>,
}

impl SshConnection {
    pub(super) const fn new(runtime: Runtime, handle: Handle<HostKeyCheck>) -> Self {
        Self { runtime, handle }
    }
}

impl Connection for SshConnection {
    type Shell = SshShell;

    fn open_shell(self) -> Result<Self::Shell, ChannelError> {
        let Self { runtime, handle } = self;

        let opened = runtime.block_on(async {
            let channel = handle.channel_open_session().await?;
            channel
                .request_pty(false, TERMINAL, TERMINAL_COLUMNS, TERMINAL_ROWS, 0, 0, &[])
                .await?;
            channel.request_shell(false).await?;
            Ok::<_, russh::Error>(channel)
        });

        match opened {
            Ok(channel) => {
                trace_transport!("interactive shell opened ({TERMINAL} {TERMINAL_COLUMNS}x{TERMINAL_ROWS})");
                Ok(SshShell {
                    runtime,
                    handle: Some(handle),
                    channel: Some(channel),
                    pending: ReceiveBuffer::default(),
                    remote_closed: false,
                })
            }
            Err(error) => {
                let _ = runtime.block_on(handle.disconnect(Disconnect::ByApplication, "", "en"));
                Err(ChannelError::from(error))
            }
        }
    }
}

/// Interactive shell over an SSH session channel.
///
/// The shell owns the session; closing (or dropping) it sends EOF, closes the
/// channel and disconnects.
pub struct SshShell {
    runtime: Runtime,
    handle: Option<Handle<HostKeyCheck>>,
    channel: Option<Channel<Msg>>,
    pending: ReceiveBuffer,
    remote_closed: bool,
}

impl SshShell {
    /// Reports whether the server has sent EOF or closed the channel.
    #[must_use]
    pub const fn remote_closed(&self) -> bool {
        self.remote_closed
    }
}

impl ShellChannel for SshShell {
    fn send(&mut self, data: &[u8]) -> Result<(), ChannelError> {
        let channel = self.channel.as_ref().ok_or(ChannelError::Closed)?;
        trace_io!("sending {} bytes", data.len());
        self.runtime
            .block_on(channel.data(data))
            .map_err(ChannelError::from)
    }

    fn receive(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>, ChannelError> {
        let channel = self.channel.as_mut().ok_or(ChannelError::Closed)?;

        if self.pending.len() < max_bytes && !self.remote_closed {
            let pending = &mut self.pending;
            let deadline = Instant::now() + timeout;
            let remote_closed = self.runtime.block_on(async {
                while pending.len() < max_bytes {
                    let wait = if pending.is_empty() {
                        deadline.saturating_duration_since(Instant::now())
                    } else {
                        Duration::ZERO
                    };
                    match tokio::time::timeout(wait, channel.wait()).await {
                        Ok(Some(ChannelMsg::Data { data })) => pending.extend(&data[..]),
                        Ok(Some(ChannelMsg::ExtendedData { data, .. })) => {
                            pending.extend(&data[..]);
                        }
                        Ok(Some(ChannelMsg::Eof | ChannelMsg::Close) | None) => return true,
                        Ok(Some(_)) => {}
                        Err(_) => break,
                    }
                }
                false
            });
            if remote_closed {
                trace_transport!("remote side closed the shell");
                self.remote_closed = true;
            }
        }

        let chunk = self.pending.take(max_bytes);
        trace_io!(
            "received {} bytes ({} still buffered)",
            chunk.len(),
            self.pending.len()
        );
        Ok(chunk)
    }

    fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            let _ = self.runtime.block_on(async {
                let _ = channel.eof().await;
                channel.close().await
            });
        }
        if let Some(handle) = self.handle.take() {
            let _ = self
                .runtime
                .block_on(handle.disconnect(Disconnect::ByApplication, "", "en"));
            trace_transport!("ssh session closed");
        }
        self.pending.clear();
    }

    fn is_closed(&self) -> bool {
        self.channel.is_none()
    }
}

impl Drop for SshShell {
    fn drop(&mut self) {
        self.close();
    }
}
