//! crates/cli/src/job.rs
//! One backup run: capture, archive, prune.
//!
//! The job prints one status line per step. A failed or empty capture ends
//! the run before anything touches the archive directory, so existing
//! archives survive a device outage. Retention runs only after the new
//! archive has been written; problems while pruning are reported but do not
//! fail the job.

use std::io::Write;
use std::time::SystemTime;

use archive::{ArchiveWriter, DateStamp, Remover, RetentionPolicy};
use logging::{Status, StatusSink};
use session::{SessionAutomaton, SessionState};
use shell_io::{ChannelError, ChannelErrorKind, Connector};

use crate::diagnostics::flush_diagnostics;
use crate::exit_code::ExitCode;
use crate::options::JobOptions;

/// A configured backup of one device.
#[derive(Clone, Debug)]
pub struct BackupJob {
    options: JobOptions,
    stamp: Option<DateStamp>,
    now: Option<SystemTime>,
    remover: Option<Remover>,
}

impl BackupJob {
    /// Creates a job that stamps archives with today's date.
    #[must_use]
    pub const fn new(options: JobOptions) -> Self {
        Self {
            options,
            stamp: None,
            now: None,
            remover: None,
        }
    }

    /// Pins the archive date and the reference time used for retention.
    #[must_use]
    pub fn with_clock(mut self, stamp: DateStamp, now: SystemTime) -> Self {
        self.stamp = Some(stamp);
        self.now = Some(now);
        self
    }

    /// Replaces how expired archives are deleted during pruning.
    #[must_use]
    pub const fn with_remover(mut self, remove: Remover) -> Self {
        self.remover = Some(remove);
        self
    }

    /// Options the job was built from.
    #[must_use]
    pub const fn options(&self) -> &JobOptions {
        &self.options
    }

    /// Runs the job, writing status lines to `status` and diagnostics to
    /// `stderr`.
    pub fn run<C, W, E>(self, connector: C, status: &mut StatusSink<W>, stderr: &mut E) -> ExitCode
    where
        C: Connector,
        W: Write,
        E: Write + ?Sized,
    {
        let name = self.options.device.as_str().to_owned();
        let ip = self.options.target.host.clone();
        let stamp = self.stamp.unwrap_or_else(DateStamp::today);

        let _ = status.write(Status::progress(format!(
            "Starting backup for {name} ({ip})..."
        )));
        let _ = status.flush();

        let automaton = SessionAutomaton::new(
            connector,
            self.options.target.clone(),
            self.options.credentials.clone(),
            self.options.session.clone(),
        );
        let (outcome, trace) = automaton.run_traced();
        flush_diagnostics(stderr);

        if trace.visited(SessionState::AuthenticatingPrivilege) {
            let _ = status.write(Status::progress(format!("Connected successfully to {ip}")));
        }

        let capture = match outcome {
            Ok(capture) if !capture.is_empty() => capture,
            Ok(_) => {
                tracing::warn!(target: "cfgvault::session", "device returned an empty configuration");
                flush_diagnostics(stderr);
                return fail(status, &name, ExitCode::CaptureFailed);
            }
            Err(error) => {
                let _ = status.write(session_failure(error.cause(), &ip));
                return fail(status, &name, ExitCode::CaptureFailed);
            }
        };

        let writer = ArchiveWriter::new(&self.options.backup_dir);
        let record = match writer.write(capture.text(), &self.options.device, stamp) {
            Ok(record) => record,
            Err(error) => {
                flush_diagnostics(stderr);
                let _ = status.write(Status::recoverable(format!("Unexpected error: {error}")));
                return fail(status, &name, ExitCode::ArchiveFailed);
            }
        };
        flush_diagnostics(stderr);
        let _ = status.write(Status::success(format!(
            "Saved backup: {}",
            record.path().display()
        )));

        let mut policy = RetentionPolicy::new(self.options.device.clone(), self.options.days);
        if let Some(remove) = self.remover {
            policy = policy.with_remover(remove);
        }
        let report = policy.prune_at(
            &self.options.backup_dir,
            self.now.unwrap_or_else(SystemTime::now),
        );
        flush_diagnostics(stderr);
        if report.is_clean() {
            let _ = status.write(Status::success(format!(
                "Deleted old backups for {name} older than {} days.",
                self.options.days
            )));
        } else {
            for failure in report.failures() {
                let _ = status.write(Status::recoverable(format!("Unexpected error: {failure}")));
            }
        }

        let _ = status.write(Status::success(format!("Backup job for {name} succeeded.")));
        let _ = status.flush();
        ExitCode::Ok
    }
}

fn session_failure(error: &ChannelError, ip: &str) -> Status {
    match error.kind() {
        ChannelErrorKind::Auth => Status::recoverable(format!("Authentication failed for {ip}")),
        ChannelErrorKind::Transport | ChannelErrorKind::Timeout => {
            Status::recoverable(format!("Socket error while connecting to {ip}"))
        }
        ChannelErrorKind::Other => Status::recoverable(format!("Unexpected error: {error}")),
    }
}

fn fail<W: Write>(status: &mut StatusSink<W>, name: &str, code: ExitCode) -> ExitCode {
    let _ = status.write(Status::failure(format!("Backup job for {name} failed.")));
    let _ = status.flush();
    code
}
