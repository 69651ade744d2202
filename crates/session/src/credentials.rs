//! crates/session/src/credentials.rs
//! Endpoint and login material for one session.

use std::fmt;

use zeroize::Zeroizing;

/// Network endpoint of the device.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Target {
    /// Address or host name.
    pub host: String,
    /// TCP port of the SSH service.
    pub port: u16,
}

impl Target {
    /// Standard SSH port.
    pub const DEFAULT_PORT: u16 = 22;

    /// Creates a target.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A password that is wiped from memory when dropped and never printed.
#[derive(Clone, Default, Eq, PartialEq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wraps `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrows the secret text.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Reports whether the secret is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Login and privilege-escalation secrets.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Login name.
    pub username: String,
    /// Login password.
    pub password: Secret,
    /// Secret answered to the privilege-escalation prompt.
    pub enable_secret: Secret,
}

impl Credentials {
    /// Creates a credential set.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<Secret>,
        enable_secret: impl Into<Secret>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            enable_secret: enable_secret.into(),
        }
    }
}
