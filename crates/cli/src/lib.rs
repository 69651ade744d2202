#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the front-end of the `cfgvault` binary. [`run`] parses the
//! command line, resolves secrets from flags, environment or an interactive
//! prompt, and executes one [`BackupJob`]: capture the device's running
//! configuration, archive it, prune archives past the retention window.
//!
//! # Design
//!
//! The function accepts the argument list and the two output handles so
//! integration tests can drive it without spawning a process. Operator status
//! lines go to stdout through a [`logging::StatusSink`]; parse errors and
//! `-v` diagnostics go to stderr. The returned status follows [`ExitCode`],
//! and [`exit_code_from`] turns it into a [`std::process::ExitCode`].
//!
//! [`BackupJob::run`] is generic over [`shell_io::Connector`]; the binary
//! passes the SSH connector, tests pass a scripted one.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["cfgvault", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("cfgvault "));
//! ```

mod arguments;
mod diagnostics;
mod exit_code;
mod job;
mod options;

use std::ffi::OsString;
use std::io::{self, Write};

use logging::{StatusSink, init_tracing};

pub use arguments::{PROGRAM_NAME, ParsedArgs, parse_args, render_help};
pub use diagnostics::flush_diagnostics;
pub use exit_code::ExitCode;
pub use job::BackupJob;
pub use options::{ENABLE_ENV, JobOptions, PASSWORD_ENV, UsageError, verbosity_config};

/// Largest status a process can report.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Runs `cfgvault` with `args` (program name first) and returns its exit
/// status.
pub fn run<I, S, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let _ = write!(stderr, "{}", error.render());
            return ExitCode::Syntax.as_i32();
        }
    };

    if parsed.show_help {
        let _ = write!(stdout, "{}", render_help());
        return ExitCode::Ok.as_i32();
    }
    if parsed.show_version {
        let _ = writeln!(stdout, "{PROGRAM_NAME} {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::Ok.as_i32();
    }

    let options = verbosity_config(&parsed).and_then(|verbosity| {
        init_tracing(verbosity);
        JobOptions::resolve(parsed, |key| std::env::var(key).ok(), prompt_secret)
    });
    let options = match options {
        Ok(options) => options,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            let _ = writeln!(
                stderr,
                "Try '{PROGRAM_NAME} --help' for more information."
            );
            return ExitCode::Syntax.as_i32();
        }
    };

    let connector = connector_for(&options);
    let mut status = StatusSink::new(stdout);
    BackupJob::new(options)
        .run(connector, &mut status, stderr)
        .as_i32()
}

/// Converts a status returned by [`run`] into a process exit code.
#[must_use]
pub fn exit_code_from(status: i32) -> std::process::ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    std::process::ExitCode::from(u8::try_from(clamped).unwrap_or(u8::MAX))
}

#[cfg(feature = "embedded-ssh")]
fn connector_for(options: &JobOptions) -> shell_io::SshConnector {
    use shell_io::{HostKeyPolicy, SshConnector};

    let policy = if options.strict_host_keys {
        HostKeyPolicy::KnownHosts
    } else {
        HostKeyPolicy::AcceptAny
    };
    SshConnector::new()
        .with_host_key_policy(policy)
        .with_connect_timeout(options.connect_timeout)
}

#[cfg(not(feature = "embedded-ssh"))]
fn connector_for(_options: &JobOptions) -> shell_io::UnsupportedConnector {
    shell_io::UnsupportedConnector
}

#[cfg(feature = "embedded-ssh")]
fn prompt_secret(label: &str) -> io::Result<Option<String>> {
    use is_terminal::IsTerminal;

    if !io::stdin().is_terminal() {
        return Ok(None);
    }
    rpassword::prompt_password(label).map(Some)
}

#[cfg(not(feature = "embedded-ssh"))]
fn prompt_secret(_label: &str) -> io::Result<Option<String>> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_captured(args: &[&str]) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let status = run(args.iter().copied(), &mut stdout, &mut stderr);
        (
            status,
            String::from_utf8(stdout).expect("utf8 stdout"),
            String::from_utf8(stderr).expect("utf8 stderr"),
        )
    }

    #[test]
    fn version_goes_to_stdout() {
        let (status, stdout, stderr) = run_captured(&["cfgvault", "--version"]);
        assert_eq!(status, 0);
        assert_eq!(stdout, format!("cfgvault {}\n", env!("CARGO_PKG_VERSION")));
        assert!(stderr.is_empty());
    }

    #[test]
    fn help_goes_to_stdout() {
        let (status, stdout, _) = run_captured(&["cfgvault", "--help"]);
        assert_eq!(status, 0);
        assert!(stdout.contains("--backup-dir"));
    }

    #[test]
    fn unknown_flag_is_a_syntax_error() {
        let (status, stdout, stderr) = run_captured(&["cfgvault", "--bogus"]);
        assert_eq!(status, ExitCode::Syntax.as_i32());
        assert!(stdout.is_empty());
        assert!(stderr.contains("--bogus"));
    }

    #[test]
    fn missing_required_options_are_a_syntax_error() {
        let (status, stdout, stderr) = run_captured(&["cfgvault", "--ip", "10.0.0.1"]);
        assert_eq!(status, 1);
        assert!(stdout.is_empty());
        assert!(stderr.contains("missing required option(s): --user"), "{stderr}");
        assert!(stderr.contains("Try 'cfgvault --help'"));
    }

    #[test]
    fn unknown_debug_category_is_a_syntax_error() {
        let (status, stdout, stderr) = run_captured(&["cfgvault", "--debug", "bogus"]);
        assert_eq!(status, ExitCode::Syntax.as_i32());
        assert!(stdout.is_empty());
        assert!(
            stderr.contains("invalid --debug flag 'bogus': unknown debug flag: bogus"),
            "{stderr}"
        );
    }

    #[test]
    fn exit_code_from_clamps() {
        assert_eq!(exit_code_from(0), std::process::ExitCode::SUCCESS);
        assert_eq!(exit_code_from(10), std::process::ExitCode::from(10));
        assert_eq!(exit_code_from(-3), std::process::ExitCode::SUCCESS);
        assert_eq!(exit_code_from(4096), std::process::ExitCode::from(255));
    }
}
