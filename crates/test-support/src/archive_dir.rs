//! crates/test-support/src/archive_dir.rs
//! Temporary archive directories with controllable file ages.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use tempfile::TempDir;

/// One day, the unit retention windows are expressed in.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// A scratch directory that is removed when dropped.
#[derive(Debug)]
pub struct ArchiveDir {
    root: TempDir,
}

impl ArchiveDir {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temporary archive directory"),
        }
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Path of `name` inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    /// Creates `name` with `contents`, modified `age` before `now`.
    pub fn file_aged(&self, name: &str, contents: &str, now: SystemTime, age: Duration) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, contents).expect("write archive fixture");
        let mtime = now.checked_sub(age).expect("age fits before now");
        filetime::set_file_mtime(&path, FileTime::from_system_time(mtime))
            .expect("set fixture mtime");
        path
    }

    /// Creates `name` modified `days` whole days before `now`.
    pub fn file_days_old(&self, name: &str, now: SystemTime, days: u32) -> PathBuf {
        self.file_aged(name, "hostname fixture\n", now, DAY * days)
    }

    /// Reads `name` as UTF-8.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.join(name)).expect("read archive file")
    }

    /// Reports whether `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.join(name).exists()
    }

    /// Sorted names of every entry in the directory.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("list archive directory")
            .map(|entry| {
                entry
                    .expect("directory entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

impl Default for ArchiveDir {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aged_files_carry_requested_mtime() {
        let dir = ArchiveDir::new();
        let now = SystemTime::now();
        let path = dir.file_days_old("r1_010124.conf", now, 40);

        let modified = fs::metadata(&path).expect("metadata").modified().expect("mtime");
        let age = now.duration_since(modified).expect("in the past");
        assert!(age >= DAY * 40 - Duration::from_secs(1));
        assert!(age <= DAY * 40 + Duration::from_secs(1));
    }

    #[test]
    fn names_are_sorted() {
        let dir = ArchiveDir::new();
        let now = SystemTime::now();
        dir.file_days_old("b_1.conf", now, 0);
        dir.file_days_old("a_1.conf", now, 0);
        assert_eq!(dir.file_names(), ["a_1.conf", "b_1.conf"]);
        assert!(dir.contains("a_1.conf"));
        assert_eq!(dir.read("a_1.conf"), "hostname fixture\n");
    }
}
