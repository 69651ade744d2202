#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `archive` stores captured configurations as dated files and removes old
//! ones. Archives are named `{device}_{DDMMYY}.conf` (see
//! [`archive_file_name`]) and contain LF-only text.
//!
//! - [`ArchiveWriter`] normalizes line endings, creates the base directory
//!   and replaces the day's archive atomically.
//! - [`RetentionPolicy`] scans the base directory for one device's archives
//!   and deletes those older than the retention window, reporting per-file
//!   failures in a [`PruneReport`] instead of aborting.
//!
//! # Examples
//!
//! ```
//! use archive::{ArchiveWriter, DateStamp, DeviceName, RetentionPolicy};
//!
//! let dir = tempfile::tempdir()?;
//! let device = DeviceName::new("core-sw1")?;
//! let record = ArchiveWriter::new(dir.path())
//!     .write("hostname R1\r\nend\r\n", &device, DateStamp::parse("010124")?)?;
//! assert_eq!(std::fs::read_to_string(record.path())?, "hostname R1\nend\n");
//!
//! let report = RetentionPolicy::new(device, 30).prune(dir.path());
//! assert!(report.removed().is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod naming;
mod retention;
mod writer;

pub use error::ArchiveError;
pub use naming::{ARCHIVE_EXTENSION, DateStamp, DeviceName, archive_file_name};
pub use retention::{PruneReport, Remover, RetentionPolicy};
pub use writer::{ArchiveRecord, ArchiveWriter, normalize_line_endings};
