//! crates/shell_io/src/ssh/mod.rs
//! Embedded SSH client backing the [`Connector`] trait.
//!
//! The client is asynchronous internally. Each connection owns a
//! current-thread tokio runtime and blocks on it, which keeps the rest of
//! cfgvault synchronous and lets one backup job run per process without a
//! global executor.

mod connection;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use logging::{trace_connect, trace_transport};
use russh::client;
use russh::keys::PublicKey;

use crate::channel::Connector;
use crate::error::ChannelError;

pub use connection::{SshConnection, SshShell};

/// Default deadline for the TCP connect plus SSH handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// How the client treats the server's host key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum HostKeyPolicy {
    /// Accept any host key without verification.
    #[default]
    AcceptAny,
    /// Require the key to be present in the user's `known_hosts` file.
    KnownHosts,
}

/// Password-authenticating SSH connector.
///
/// ```
/// use std::time::Duration;
/// use shell_io::{HostKeyPolicy, SshConnector};
///
/// let connector = SshConnector::new()
///     .with_host_key_policy(HostKeyPolicy::KnownHosts)
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(connector.host_key_policy(), HostKeyPolicy::KnownHosts);
/// ```
#[derive(Clone, Debug)]
pub struct SshConnector {
    host_key_policy: HostKeyPolicy,
    connect_timeout: Duration,
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl SshConnector {
    /// Creates a connector that accepts any host key and waits up to
    /// [`DEFAULT_CONNECT_TIMEOUT`] for the handshake.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            host_key_policy: HostKeyPolicy::AcceptAny,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Sets the host key policy.
    #[must_use]
    pub const fn with_host_key_policy(mut self, policy: HostKeyPolicy) -> Self {
        self.host_key_policy = policy;
        self
    }

    /// Sets the connect/handshake deadline.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns the configured host key policy.
    #[must_use]
    pub const fn host_key_policy(&self) -> HostKeyPolicy {
        self.host_key_policy
    }

    /// Returns the configured connect deadline.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

impl Connector for SshConnector {
    type Connection = SshConnection;

    fn connect(
        &self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> Result<Self::Connection, ChannelError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| ChannelError::transport("failed to start ssh runtime", source))?;

        let config = Arc::new(client::Config::default());
        let checker = HostKeyCheck {
            host: host.to_owned(),
            port,
            policy: self.host_key_policy,
        };
        let deadline = self.connect_timeout;

        trace_transport!("connecting to {}:{} (timeout {:?})", host, port, deadline);
        let mut handle = runtime.block_on(async {
            match tokio::time::timeout(deadline, client::connect(config, (host, port), checker))
                .await
            {
                Ok(result) => result.map_err(|error| connect_error(host, port, error)),
                Err(_) => Err(ChannelError::Timeout {
                    operation: "connect",
                    after: deadline,
                }),
            }
        })?;

        let auth = runtime
            .block_on(handle.authenticate_password(username, password))
            .map_err(ChannelError::from)?;
        if !auth.success() {
            let _ = runtime.block_on(handle.disconnect(
                russh::Disconnect::ByApplication,
                "",
                "en",
            ));
            return Err(ChannelError::Auth {
                username: username.to_owned(),
                host: host.to_owned(),
            });
        }

        trace_connect!("authenticated as {} on {}:{}", username, host, port);
        Ok(SshConnection::new(runtime, handle))
    }
}

fn connect_error(host: &str, port: u16, error: russh::Error) -> ChannelError {
    match error {
        russh::Error::IO(source) => {
            ChannelError::transport(format!("failed to connect to {host}:{port}"), source)
        }
        other => ChannelError::from(other),
    }
}

/// Client-side handler that applies the [`HostKeyPolicy`].
#[derive(Debug)]
pub(crate) struct HostKeyCheck {
    host: String,
    port: u16,
    policy: HostKeyPolicy,
}

impl client::Handler for HostKeyCheck {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        match self.policy {
            HostKeyPolicy::AcceptAny => Ok(true),
            HostKeyPolicy::KnownHosts => {
                match russh::keys::check_known_hosts(&self.host, self.port, server_public_key) {
                    Ok(known) => {
                        if !known {
                            tracing::warn!(
                                target: "cfgvault::transport",
                                "host key for {}:{} is not in known_hosts",
                                self.host,
                                self.port
                            );
                        }
                        Ok(known)
                    }
                    Err(error) => {
                        tracing::warn!(
                            target: "cfgvault::transport",
                            "host key check for {}:{} failed: {}",
                            self.host,
                            self.port,
                            error
                        );
                        Ok(false)
                    }
                }
            }
        }
    }
}
