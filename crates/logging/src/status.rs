//! crates/logging/src/status.rs
//! Operator-facing status lines.
//!
//! Every step of a backup run reports one line whose prefix tells the
//! operator how the step went. These lines are always printed, independent of
//! the verbosity flags that gate the diagnostic stream.

use std::borrow::Borrow;
use std::fmt;
use std::io::{self, Write};

/// Outcome class of a status line.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StatusKind {
    /// Work in progress (`[+]`).
    Progress,
    /// A step failed but the run continues (`[-]`).
    Recoverable,
    /// A step completed (`[✓]`).
    Success,
    /// The job failed (`[!]`).
    Failure,
}

impl StatusKind {
    /// Returns the bracketed marker rendered at the start of the line.
    ///
    /// ```
    /// use logging::StatusKind;
    ///
    /// assert_eq!(StatusKind::Progress.marker(), "[+]");
    /// assert_eq!(StatusKind::Success.marker(), "[✓]");
    /// ```
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Progress => "[+]",
            Self::Recoverable => "[-]",
            Self::Success => "[✓]",
            Self::Failure => "[!]",
        }
    }

    /// Reports whether the line describes something that went wrong.
    #[must_use]
    pub const fn is_problem(self) -> bool {
        matches!(self, Self::Recoverable | Self::Failure)
    }
}

/// A single status line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Status {
    kind: StatusKind,
    text: String,
}

impl Status {
    /// Creates a status line of the given kind.
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Creates a `[+]` line.
    pub fn progress(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Progress, text)
    }

    /// Creates a `[-]` line.
    pub fn recoverable(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Recoverable, text)
    }

    /// Creates a `[✓]` line.
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    /// Creates a `[!]` line.
    pub fn failure(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Failure, text)
    }

    /// Returns the outcome class.
    #[must_use]
    pub const fn kind(&self) -> StatusKind {
        self.kind
    }

    /// Returns the text following the marker.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.marker(), self.text)
    }
}

/// Streaming sink that renders [`Status`] values into an [`io::Write`] target.
///
/// ```
/// use logging::{Status, StatusSink};
///
/// let mut sink = StatusSink::new(Vec::new());
/// sink.write(Status::progress("Starting backup for core-sw1 (10.0.0.1)..."))?;
/// sink.write(Status::failure("Backup job for core-sw1 failed."))?;
///
/// let output = String::from_utf8(sink.into_inner()).unwrap();
/// assert_eq!(output.lines().count(), 2);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct StatusSink<W> {
    writer: W,
}

impl<W> StatusSink<W> {
    /// Creates a sink that writes one newline-terminated line per status.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Mutably borrows the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the sink and returns the wrapped writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> StatusSink<W>
where
    W: Write,
{
    /// Writes a single status line.
    pub fn write<S>(&mut self, status: S) -> io::Result<()>
    where
        S: Borrow<Status>,
    {
        writeln!(self.writer, "{}", status.borrow())
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
