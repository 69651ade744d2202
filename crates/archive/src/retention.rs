//! crates/archive/src/retention.rs
//! Age-based removal of a device's old archives.
//!
//! A file is expired when the number of whole days since its modification
//! time is strictly greater than the retention window. A file exactly N days
//! old, or N days and some hours, survives a window of N days. Files modified
//! in the future are never expired. Only files named exactly
//! `{device}_{DDMMYY}.conf` belong to a device.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use logging::trace_prune;

use crate::error::ArchiveError;
use crate::naming::DeviceName;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Deletes one expired archive.
pub type Remover = fn(&Path) -> io::Result<()>;

/// Which archives to keep for one device.
#[derive(Clone, Debug)]
pub struct RetentionPolicy {
    device: DeviceName,
    max_age_days: u32,
    remove: Remover,
}

impl RetentionPolicy {
    /// Default retention window in days.
    pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;

    /// Keeps archives of `device` for `max_age_days` whole days.
    pub const fn new(device: DeviceName, max_age_days: u32) -> Self {
        Self {
            device,
            max_age_days,
            remove: remove_archive,
        }
    }

    /// Replaces the function used to delete expired archives.
    #[must_use]
    pub const fn with_remover(mut self, remove: Remover) -> Self {
        self.remove = remove;
        self
    }

    /// Device whose archives the policy applies to.
    #[must_use]
    pub const fn device(&self) -> &DeviceName {
        &self.device
    }

    /// Retention window in whole days.
    #[must_use]
    pub const fn max_age_days(&self) -> u32 {
        self.max_age_days
    }

    /// Reports whether a file modified at `modified` is expired at `now`.
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    /// use archive::{DeviceName, RetentionPolicy};
    ///
    /// let policy = RetentionPolicy::new(DeviceName::new("r1")?, 30);
    /// let now = SystemTime::now();
    /// let day = Duration::from_secs(86_400);
    /// assert!(!policy.is_expired(now - day * 30, now));
    /// assert!(policy.is_expired(now - day * 31, now));
    /// # Ok::<(), archive::ArchiveError>(())
    /// ```
    #[must_use]
    pub fn is_expired(&self, modified: SystemTime, now: SystemTime) -> bool {
        now.duration_since(modified)
            .map(|age| whole_days(age) > u64::from(self.max_age_days))
            .unwrap_or(false)
    }

    /// Prunes `base_dir` against the current time.
    pub fn prune(&self, base_dir: &Path) -> PruneReport {
        self.prune_at(base_dir, SystemTime::now())
    }

    /// Deletes every expired regular file in `base_dir` named
    /// `{device}_{DDMMYY}.conf`.
    ///
    /// The scan never stops early: a file that cannot be inspected or removed
    /// is recorded in [`PruneReport::failures`] and the remaining entries are
    /// still processed. A missing directory yields an empty report.
    pub fn prune_at(&self, base_dir: &Path, now: SystemTime) -> PruneReport {
        let mut report = PruneReport::default();

        let entries = match fs::read_dir(base_dir) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return report,
            Err(error) => {
                report
                    .failures
                    .push(ArchiveError::io("list archive directory", base_dir, error));
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    report
                        .failures
                        .push(ArchiveError::io("read entry in", base_dir, error));
                    continue;
                }
            };
            let owned = entry
                .file_name()
                .to_str()
                .is_some_and(|name| self.device.owns_archive(name));
            if !owned {
                continue;
            }

            let path = entry.path();
            let modified = match entry.metadata() {
                Ok(metadata) if !metadata.is_file() => continue,
                Ok(metadata) => metadata.modified(),
                Err(error) => Err(error),
            };
            let modified = match modified {
                Ok(modified) => modified,
                Err(error) => {
                    report
                        .failures
                        .push(ArchiveError::io("inspect archive", path, error));
                    continue;
                }
            };

            if !self.is_expired(modified, now) {
                report.kept.push(path);
                continue;
            }
            match (self.remove)(&path) {
                Ok(()) => {
                    trace_prune!("removed {}", path.display());
                    report.removed.push(path);
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => {
                    tracing::warn!(
                        target: "cfgvault::prune",
                        "failed to remove {}: {}",
                        path.display(),
                        error
                    );
                    report
                        .failures
                        .push(ArchiveError::io("remove expired archive", path, error));
                }
            }
        }

        report.removed.sort();
        report.kept.sort();
        report
    }
}

fn remove_archive(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

fn whole_days(age: Duration) -> u64 {
    age.as_secs() / SECONDS_PER_DAY
}

/// Outcome of one pruning pass.
#[derive(Debug, Default)]
pub struct PruneReport {
    removed: Vec<PathBuf>,
    kept: Vec<PathBuf>,
    failures: Vec<ArchiveError>,
}

impl PruneReport {
    /// Archives that were deleted, sorted by path.
    #[must_use]
    pub fn removed(&self) -> &[PathBuf] {
        &self.removed
    }

    /// Archives of the device that are still within the window, sorted by path.
    #[must_use]
    pub fn kept(&self) -> &[PathBuf] {
        &self.kept
    }

    /// Per-file failures; none of them stopped the scan.
    #[must_use]
    pub fn failures(&self) -> &[ArchiveError] {
        &self.failures
    }

    /// Reports whether every expired archive was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
