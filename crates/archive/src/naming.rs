//! crates/archive/src/naming.rs
//! Device labels, date stamps and archive file names.
//!
//! An archive is named `{device}_{DDMMYY}.conf`. The device label doubles as
//! the retention prefix, so it is validated to stay a single path component.

use std::fmt;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::ArchiveError;

/// Extension of every archive file.
pub const ARCHIVE_EXTENSION: &str = "conf";

/// Day, month and two-digit year without separators.
const STAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day][month][year repr:last_two]");

/// A device label usable as a file name prefix.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DeviceName(String);

impl DeviceName {
    /// Validates `name`.
    ///
    /// ```
    /// use archive::DeviceName;
    ///
    /// assert!(DeviceName::new("core-sw1").is_ok());
    /// assert!(DeviceName::new("../etc").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, ArchiveError> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.contains(['/', '\\']) {
            Some("name contains a path separator")
        } else if name.contains('\0') {
            Some("name contains a NUL byte")
        } else if name == "." || name.contains("..") {
            Some("name contains a relative path component")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(ArchiveError::InvalidDeviceName { name, reason }),
            None => Ok(Self(name)),
        }
    }

    /// The label as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix shared by every archive of this device (`{name}_`).
    #[must_use]
    pub fn file_prefix(&self) -> String {
        format!("{}_", self.0)
    }

    /// Reports whether `file_name` is `{name}_{DDMMYY}.conf` for this device.
    ///
    /// Only the exact shape matches, so `core` does not claim the archives of
    /// `core_sw1`.
    ///
    /// ```
    /// use archive::DeviceName;
    ///
    /// let core = DeviceName::new("core")?;
    /// assert!(core.owns_archive("core_010124.conf"));
    /// assert!(!core.owns_archive("core_sw1_010124.conf"));
    /// # Ok::<(), archive::ArchiveError>(())
    /// ```
    #[must_use]
    pub fn owns_archive(&self, file_name: &str) -> bool {
        file_name
            .strip_prefix(self.0.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix(ARCHIVE_EXTENSION))
            .and_then(|rest| rest.strip_suffix('.'))
            .is_some_and(|stamp| stamp.len() == 6 && stamp.bytes().all(|byte| byte.is_ascii_digit()))
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar day rendered as `DDMMYY`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DateStamp(Date);

impl DateStamp {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    /// Today in the local time zone, or in UTC when the local offset is unknown.
    #[must_use]
    pub fn today() -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self(OffsetDateTime::now_utc().to_offset(offset).date())
    }

    /// Parses a six-digit `DDMMYY` stamp.
    ///
    /// ```
    /// use archive::DateStamp;
    ///
    /// let stamp = DateStamp::parse("150224")?;
    /// assert_eq!(stamp.to_string(), "150224");
    /// assert!(DateStamp::parse("310224").is_err());
    /// # Ok::<(), archive::ArchiveError>(())
    /// ```
    pub fn parse(text: &str) -> Result<Self, ArchiveError> {
        let invalid = || ArchiveError::InvalidDateStamp(text.to_owned());
        if text.len() != 6 || !text.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(invalid());
        }
        let field = |range: std::ops::Range<usize>| text[range].parse::<u8>().map_err(|_| invalid());
        let day = field(0..2)?;
        let month = time::Month::try_from(field(2..4)?).map_err(|_| invalid())?;
        // Two-digit years are read as 20YY.
        let year = 2000 + i32::from(field(4..6)?);
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// The wrapped date.
    #[must_use]
    pub const fn date(self) -> Date {
        self.0
    }
}

impl fmt::Display for DateStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.0.format(STAMP_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

/// File name of the archive for `device` on `stamp`.
///
/// ```
/// use archive::{DateStamp, DeviceName, archive_file_name};
///
/// let device = DeviceName::new("core-sw1")?;
/// let stamp = DateStamp::parse("010124")?;
/// assert_eq!(archive_file_name(&device, stamp), "core-sw1_010124.conf");
/// # Ok::<(), archive::ArchiveError>(())
/// ```
#[must_use]
pub fn archive_file_name(device: &DeviceName, stamp: DateStamp) -> String {
    format!("{}{stamp}.{ARCHIVE_EXTENSION}", device.file_prefix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn stamp_is_day_month_two_digit_year() {
        let date = Date::from_calendar_date(2024, Month::January, 1).expect("valid date");
        assert_eq!(DateStamp::from_date(date).to_string(), "010124");

        let date = Date::from_calendar_date(2031, Month::November, 23).expect("valid date");
        assert_eq!(DateStamp::from_date(date).to_string(), "231131");
    }

    #[test]
    fn parse_round_trips_display() {
        let stamp = DateStamp::parse("290224").expect("leap day");
        assert_eq!(stamp.date().year(), 2024);
        assert_eq!(stamp.to_string(), "290224");
    }

    #[test]
    fn parse_rejects_malformed_stamps() {
        for bad in ["", "01012", "0101245", "01-124", "320124", "011324", "290223"] {
            assert!(DateStamp::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn today_renders_six_digits() {
        let rendered = DateStamp::today().to_string();
        assert_eq!(rendered.len(), 6);
        assert!(rendered.bytes().all(|byte| byte.is_ascii_digit()));
    }

    #[test]
    fn device_names_must_stay_inside_the_archive_directory() {
        for bad in ["", ".", "..", "a/b", "a\\b", "core..sw", "nul\0"] {
            assert!(DeviceName::new(bad).is_err(), "{bad:?} should be rejected");
        }
        let device = DeviceName::new("edge.rtr-01").expect("dots inside a label are fine");
        assert_eq!(device.file_prefix(), "edge.rtr-01_");
    }

    #[test]
    fn archive_ownership_needs_the_exact_shape() {
        let core = DeviceName::new("core").expect("valid");
        assert!(core.owns_archive("core_311299.conf"));
        for foreign in [
            "core_sw1_010124.conf",
            "core_01012.conf",
            "core_0101245.conf",
            "core_010124.conf.bak",
            "core_010124.txt",
            "core-010124.conf",
            "score_010124.conf",
            "core_.conf",
        ] {
            assert!(!core.owns_archive(foreign), "{foreign:?} is not an archive of core");
        }
        let underscored = DeviceName::new("core_sw1").expect("valid");
        assert!(underscored.owns_archive("core_sw1_010124.conf"));
    }
}
