//! crates/cli/src/exit_code.rs
//! Process exit statuses of a backup run.
//!
//! Cron wrappers and monitoring treat any non-zero status as a failed job;
//! the distinct values let them tell a device problem from a local disk
//! problem without parsing the status lines.

use std::fmt;

/// Exit status of a `cfgvault` invocation.
///
/// ```
/// use cli::ExitCode;
///
/// assert_eq!(ExitCode::CaptureFailed.as_i32(), 10);
/// assert_eq!(ExitCode::ArchiveFailed.description(), "archive write failed");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ExitCode {
    /// The configuration was archived. Retention failures do not change this.
    Ok = 0,

    /// Invalid command line or missing required option.
    Syntax = 1,

    /// The session failed or captured nothing.
    CaptureFailed = 10,

    /// The captured configuration could not be written.
    ArchiveFailed = 11,
}

impl ExitCode {
    /// Numeric process status.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Short human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Syntax => "syntax or usage error",
            Self::CaptureFailed => "configuration capture failed",
            Self::ArchiveFailed => "archive write failed",
        }
    }

    /// Maps a numeric status back to a known code.
    #[must_use]
    pub const fn from_i32(status: i32) -> Option<Self> {
        match status {
            0 => Some(Self::Ok),
            1 => Some(Self::Syntax),
            10 => Some(Self::CaptureFailed),
            11 => Some(Self::ArchiveFailed),
            _ => None,
        }
    }

    /// Reports whether the code signals success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}
