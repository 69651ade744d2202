//! crates/archive/src/error.rs

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures raised while naming, writing or pruning archives.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The device label cannot be used as a file name prefix.
    #[error("invalid device name {name:?}: {reason}")]
    InvalidDeviceName {
        /// Rejected label.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// The date stamp is not six `DDMMYY` digits forming a real date.
    #[error("invalid date stamp {0:?}: expected DDMMYY")]
    InvalidDateStamp(String),
    /// A filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// Operation that failed.
        action: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ArchiveError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Path involved in an I/O failure.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn io_error_renders_action_and_path() {
        let error = ArchiveError::io(
            "create archive directory",
            "/backups/core",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(
            error.to_string(),
            "failed to create archive directory /backups/core: denied"
        );
        assert_eq!(error.path(), Some(Path::new("/backups/core")));
        assert!(error.source().is_some());
    }

    #[test]
    fn validation_errors_have_no_path() {
        let error = ArchiveError::InvalidDateStamp("1224".to_owned());
        assert_eq!(error.to_string(), "invalid date stamp \"1224\": expected DDMMYY");
        assert!(error.path().is_none());
    }
}
