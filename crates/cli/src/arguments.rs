//! crates/cli/src/arguments.rs
//! Command-line definition and raw parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};

/// Program name used in help, version and diagnostics.
pub const PROGRAM_NAME: &str = "cfgvault";

/// Options exactly as they appeared on the command line.
///
/// Required options are kept optional here so that `--help` and `--version`
/// work without them; [`JobOptions::resolve`](crate::JobOptions::resolve)
/// applies environment fallbacks and reports what is still missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// `--help`.
    pub show_help: bool,
    /// `--version`.
    pub show_version: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
    /// `--info` values, each a comma-separated token list.
    pub info: Vec<String>,
    /// `--debug` values, each a comma-separated token list.
    pub debug: Vec<String>,
    /// `--ip`.
    pub ip: Option<String>,
    /// `--user`.
    pub user: Option<String>,
    /// `--password`.
    pub password: Option<String>,
    /// `--enable`.
    pub enable: Option<String>,
    /// `--backup-dir`.
    pub backup_dir: Option<PathBuf>,
    /// `--name`.
    pub name: Option<String>,
    /// `--port`.
    pub port: u16,
    /// `--days`.
    pub days: u32,
    /// `--settle-ms`.
    pub settle_ms: u64,
    /// `--capture-wait-ms`.
    pub capture_wait_ms: u64,
    /// `--capture-limit`.
    pub capture_limit: u64,
    /// `--connect-timeout`, in seconds.
    pub connect_timeout: u64,
    /// `--strict-host-keys`.
    pub strict_host_keys: bool,
}

fn text_option(id: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .value_name(value_name)
        .help(help)
        .action(ArgAction::Set)
}

pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Back up a network device's running configuration over SSH")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic output on stderr (repeatable).")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Per-category progress output: connect, session, archive, prune (e.g. prune2).")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Per-category debug output: connect, cmd, io, timing (e.g. io2).")
                .action(ArgAction::Append),
        )
        .arg(text_option("ip", "ADDRESS", "Device address."))
        .arg(text_option("user", "USER", "SSH login name."))
        .arg(text_option(
            "password",
            "SECRET",
            "SSH login password (or CFGVAULT_PASSWORD).",
        ))
        .arg(text_option(
            "enable",
            "SECRET",
            "Privilege-escalation secret (or CFGVAULT_ENABLE).",
        ))
        .arg(
            Arg::new("backup-dir")
                .long("backup-dir")
                .alias("backup_dir")
                .value_name("DIR")
                .help("Directory that stores the archives.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(text_option("name", "DEVICE", "Device label used as the archive file prefix."))
        .arg(
            Arg::new("port")
                .long("port")
                .value_name("PORT")
                .help("SSH port.")
                .value_parser(value_parser!(u16).range(1..))
                .default_value("22"),
        )
        .arg(
            Arg::new("days")
                .long("days")
                .value_name("DAYS")
                .help("Delete this device's archives older than DAYS days.")
                .value_parser(value_parser!(u32))
                .default_value("30"),
        )
        .arg(
            Arg::new("settle-ms")
                .long("settle-ms")
                .alias("settle_ms")
                .value_name("MS")
                .help("Wait after each short command before draining output.")
                .value_parser(value_parser!(u64))
                .default_value("500"),
        )
        .arg(
            Arg::new("capture-wait-ms")
                .long("capture-wait-ms")
                .alias("capture_wait_ms")
                .value_name("MS")
                .help("Wait after the capture command before reading the configuration.")
                .value_parser(value_parser!(u64))
                .default_value("2000"),
        )
        .arg(
            Arg::new("capture-limit")
                .long("capture-limit")
                .alias("capture_limit")
                .value_name("BYTES")
                .help("Maximum configuration size read from the device.")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("999999"),
        )
        .arg(
            Arg::new("connect-timeout")
                .long("connect-timeout")
                .alias("connect_timeout")
                .value_name("SECONDS")
                .help("Give up connecting after SECONDS seconds.")
                .value_parser(value_parser!(u64).range(1..))
                .default_value("30"),
        )
        .arg(
            Arg::new("strict-host-keys")
                .long("strict-host-keys")
                .help("Refuse devices whose host key is not in ~/.ssh/known_hosts.")
                .action(ArgAction::SetTrue),
        )
}

/// Parses `arguments` (program name first).
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;
    let mut text = |id: &str| matches.remove_one::<String>(id);

    let ip = text("ip");
    let user = text("user");
    let password = text("password");
    let enable = text("enable");
    let name = text("name");
    let mut list = |id: &str| -> Vec<String> {
        matches
            .remove_many::<String>(id)
            .map(Iterator::collect)
            .unwrap_or_default()
    };
    let info = list("info");
    let debug = list("debug");

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        verbose: matches.get_count("verbose"),
        info,
        debug,
        ip,
        user,
        password,
        enable,
        backup_dir: matches.remove_one::<PathBuf>("backup-dir"),
        name,
        port: matches.get_one::<u16>("port").copied().unwrap_or(22),
        days: matches.get_one::<u32>("days").copied().unwrap_or(30),
        settle_ms: matches.get_one::<u64>("settle-ms").copied().unwrap_or(500),
        capture_wait_ms: matches
            .get_one::<u64>("capture-wait-ms")
            .copied()
            .unwrap_or(2000),
        capture_limit: matches
            .get_one::<u64>("capture-limit")
            .copied()
            .unwrap_or(999_999),
        connect_timeout: matches
            .get_one::<u64>("connect-timeout")
            .copied()
            .unwrap_or(30),
        strict_host_keys: matches.get_flag("strict-host-keys"),
    })
}

/// Renders `--help` output.
#[must_use]
pub fn render_help() -> String {
    clap_command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ParsedArgs {
        parse_args(args.iter().copied()).expect("arguments parse")
    }

    #[test]
    fn defaults_apply_when_optional_flags_are_absent() {
        let parsed = parse(&["cfgvault", "--ip", "10.0.0.1"]);
        assert_eq!(parsed.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(parsed.port, 22);
        assert_eq!(parsed.days, 30);
        assert_eq!(parsed.settle_ms, 500);
        assert_eq!(parsed.capture_wait_ms, 2000);
        assert_eq!(parsed.capture_limit, 999_999);
        assert_eq!(parsed.connect_timeout, 30);
        assert!(!parsed.strict_host_keys);
        assert_eq!(parsed.verbose, 0);
    }

    #[test]
    fn every_flag_is_recognised() {
        let parsed = parse(&[
            "cfgvault",
            "--ip",
            "192.0.2.1",
            "--user",
            "admin",
            "--password",
            "pw",
            "--enable",
            "en",
            "--backup-dir",
            "/srv/backups",
            "--name",
            "core-sw1",
            "--port",
            "2222",
            "--days",
            "7",
            "--settle-ms",
            "100",
            "--capture-wait-ms",
            "5000",
            "--capture-limit",
            "4096",
            "--connect-timeout",
            "5",
            "--strict-host-keys",
            "-vv",
        ]);
        assert_eq!(parsed.user.as_deref(), Some("admin"));
        assert_eq!(parsed.password.as_deref(), Some("pw"));
        assert_eq!(parsed.enable.as_deref(), Some("en"));
        assert_eq!(parsed.backup_dir, Some(PathBuf::from("/srv/backups")));
        assert_eq!(parsed.name.as_deref(), Some("core-sw1"));
        assert_eq!(parsed.port, 2222);
        assert_eq!(parsed.days, 7);
        assert_eq!(parsed.settle_ms, 100);
        assert_eq!(parsed.capture_wait_ms, 5000);
        assert_eq!(parsed.capture_limit, 4096);
        assert_eq!(parsed.connect_timeout, 5);
        assert!(parsed.strict_host_keys);
        assert_eq!(parsed.verbose, 2);
    }

    #[test]
    fn underscore_backup_dir_alias_is_accepted() {
        let parsed = parse(&["cfgvault", "--backup_dir", "/tmp/b"]);
        assert_eq!(parsed.backup_dir, Some(PathBuf::from("/tmp/b")));
    }

    #[test]
    fn info_and_debug_accumulate_in_order() {
        let parsed = parse(&[
            "cfgvault",
            "--info",
            "connect,prune2",
            "--debug",
            "cmd",
            "--debug",
            "io2",
        ]);
        assert_eq!(parsed.info, ["connect,prune2"]);
        assert_eq!(parsed.debug, ["cmd", "io2"]);
    }

    #[test]
    fn help_and_version_need_no_other_options() {
        assert!(parse(&["cfgvault", "--help"]).show_help);
        assert!(parse(&["cfgvault", "-V"]).show_version);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(parse_args(["cfgvault", "--port", "ssh"]).is_err());
        assert!(parse_args(["cfgvault", "--port", "0"]).is_err());
        assert!(parse_args(["cfgvault", "--days", "-1"]).is_err());
        assert!(parse_args(["cfgvault", "--unknown-flag"]).is_err());
    }

    #[test]
    fn empty_argument_list_parses_to_defaults() {
        let parsed = parse_args(std::iter::empty::<OsString>()).expect("parses");
        assert!(parsed.ip.is_none());
        assert!(!parsed.show_help);
    }

    #[test]
    fn help_lists_required_options() {
        let help = render_help();
        for flag in ["--ip", "--user", "--password", "--enable", "--backup-dir", "--name"] {
            assert!(help.contains(flag), "help should mention {flag}");
        }
    }
}
