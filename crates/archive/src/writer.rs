//! crates/archive/src/writer.rs
//! Persisting captured configurations.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use logging::trace_archive;
use tempfile::NamedTempFile;

use crate::error::ArchiveError;
use crate::naming::{DateStamp, DeviceName, archive_file_name};

/// Converts CRLF line endings to LF.
///
/// Every carriage return directly in front of a line feed is dropped, so
/// `\r\r\n` collapses to `\n` as well and a second pass never changes the
/// result. Carriage returns elsewhere are kept. The input is borrowed when
/// there is nothing to replace.
///
/// ```
/// use archive::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("hostname R1\r\nend\r\n"), "hostname R1\nend\n");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains("\r\n") {
        return Cow::Borrowed(text);
    }
    let mut normalized = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        match line.strip_suffix('\n') {
            Some(body) => {
                normalized.push_str(body.trim_end_matches('\r'));
                normalized.push('\n');
            }
            None => normalized.push_str(line),
        }
    }
    Cow::Owned(normalized)
}

/// A persisted archive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArchiveRecord {
    device: DeviceName,
    stamp: DateStamp,
    text: String,
    path: PathBuf,
}

impl ArchiveRecord {
    /// Device the archive belongs to.
    #[must_use]
    pub const fn device(&self) -> &DeviceName {
        &self.device
    }

    /// Day the archive is filed under.
    #[must_use]
    pub const fn stamp(&self) -> DateStamp {
        self.stamp
    }

    /// Normalized text that was written.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Location of the archive file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Writes archives below a base directory.
///
/// The text is first written to a temporary file in the same directory and
/// then renamed over the final name, so readers see either the previous
/// archive or the complete new one.
#[derive(Clone, Debug)]
pub struct ArchiveWriter {
    base_dir: PathBuf,
}

impl ArchiveWriter {
    /// Creates a writer for `base_dir`; the directory is created on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory archives are written to.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path the archive for `device` on `stamp` is written to.
    #[must_use]
    pub fn path_for(&self, device: &DeviceName, stamp: DateStamp) -> PathBuf {
        self.base_dir.join(archive_file_name(device, stamp))
    }

    /// Normalizes `text` and writes it as the archive for `device` on `stamp`,
    /// replacing any archive already filed under that name.
    pub fn write(
        &self,
        text: &str,
        device: &DeviceName,
        stamp: DateStamp,
    ) -> Result<ArchiveRecord, ArchiveError> {
        fs::create_dir_all(&self.base_dir).map_err(|error| {
            ArchiveError::io("create archive directory", &self.base_dir, error)
        })?;

        let normalized = normalize_line_endings(text).into_owned();
        let path = self.path_for(device, stamp);

        let mut staged = NamedTempFile::new_in(&self.base_dir).map_err(|error| {
            ArchiveError::io("create temporary file in", &self.base_dir, error)
        })?;
        staged
            .write_all(normalized.as_bytes())
            .and_then(|()| publish_permissions(staged.as_file()))
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|error| ArchiveError::io("write", staged.path().to_path_buf(), error))?;
        staged
            .persist(&path)
            .map_err(|error| ArchiveError::io("rename archive into", &path, error.error))?;

        trace_archive!("wrote {} bytes to {}", normalized.len(), path.display());
        Ok(ArchiveRecord {
            device: device.clone(),
            stamp,
            text: normalized,
            path,
        })
    }
}

/// Archives are readable by everyone, like a file created with the default
/// umask. Temporary files start out owner-only.
#[cfg(unix)]
fn publish_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(fs::Permissions::from_mode(ARCHIVE_MODE))
}

#[cfg(not(unix))]
fn publish_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

/// Mode bits of a written archive.
#[cfg(unix)]
const ARCHIVE_MODE: u32 = 0o644;
