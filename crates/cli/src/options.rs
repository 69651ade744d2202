//! crates/cli/src/options.rs
//! Resolution of parsed arguments into a runnable job description.
//!
//! Secrets are looked up in order: command-line flag, environment variable,
//! interactive prompt. Empty values count as absent, except an explicit
//! `--enable ""` for devices that have no escalation secret.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use archive::{ArchiveError, DeviceName};
use logging::VerbosityConfig;
use session::{Credentials, SessionConfig, Target};
use thiserror::Error;

use crate::arguments::ParsedArgs;

/// Environment variable consulted when `--password` is omitted.
pub const PASSWORD_ENV: &str = "CFGVAULT_PASSWORD";

/// Environment variable consulted when `--enable` is omitted.
pub const ENABLE_ENV: &str = "CFGVAULT_ENABLE";

/// Problem with the command line that prevents a job from starting.
#[derive(Debug, Error)]
pub enum UsageError {
    /// One or more required options were not supplied.
    #[error("missing required option(s): {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// `--name` cannot be used as an archive file prefix.
    #[error("invalid --name: {0}")]
    InvalidName(#[source] ArchiveError),

    /// An `--info` or `--debug` token was not understood.
    #[error("invalid {option} flag '{token}': {reason}")]
    Verbosity {
        /// `--info` or `--debug`.
        option: &'static str,
        /// The offending token.
        token: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading a secret from the terminal failed.
    #[error("failed to read {what} from terminal: {source}")]
    Prompt {
        /// Which secret was being read.
        what: &'static str,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Everything a backup job needs, validated.
#[derive(Clone, Debug)]
pub struct JobOptions {
    /// Device address and port.
    pub target: Target,
    /// Login and escalation secrets.
    pub credentials: Credentials,
    /// Directory holding the archives.
    pub backup_dir: PathBuf,
    /// Device label used as archive prefix.
    pub device: DeviceName,
    /// Retention window in whole days.
    pub days: u32,
    /// Session timing and commands.
    pub session: SessionConfig,
    /// Bound on the TCP connect and SSH handshake.
    pub connect_timeout: Duration,
    /// Verify host keys against `~/.ssh/known_hosts`.
    pub strict_host_keys: bool,
}

impl JobOptions {
    /// Applies environment fallbacks and prompting to `parsed`.
    ///
    /// `env` looks up an environment variable. `prompt` is asked for a secret
    /// that neither a flag nor the environment supplied; it returns
    /// `Ok(None)` when no interactive prompt is available.
    pub fn resolve<E, P>(parsed: ParsedArgs, env: E, mut prompt: P) -> Result<Self, UsageError>
    where
        E: Fn(&str) -> Option<String>,
        P: FnMut(&str) -> io::Result<Option<String>>,
    {
        let ip = non_empty(parsed.ip);
        let user = non_empty(parsed.user);
        let backup_dir = parsed.backup_dir.filter(|dir| !dir.as_os_str().is_empty());
        let name = non_empty(parsed.name);
        let mut password = non_empty(parsed.password).or_else(|| non_empty(env(PASSWORD_ENV)));
        let mut enable = parsed.enable.or_else(|| non_empty(env(ENABLE_ENV)));

        let mut missing = Vec::new();
        if ip.is_none() {
            missing.push("--ip");
        }
        if user.is_none() {
            missing.push("--user");
        }

        let plain_missing = ip.is_none() || user.is_none() || backup_dir.is_none() || name.is_none();
        if password.is_none() && !plain_missing {
            password = ask(&mut prompt, "password", "Password: ")?;
        }
        if password.is_none() {
            missing.push("--password");
        }
        if enable.is_none() && !plain_missing && password.is_some() {
            enable = ask(&mut prompt, "enable secret", "Enable secret: ")?;
        }
        if enable.is_none() {
            missing.push("--enable");
        }
        if backup_dir.is_none() {
            missing.push("--backup-dir");
        }
        if name.is_none() {
            missing.push("--name");
        }

        let (Some(ip), Some(user), Some(password), Some(enable), Some(backup_dir), Some(name)) =
            (ip, user, password, enable, backup_dir, name)
        else {
            return Err(UsageError::Missing(missing));
        };

        let device = DeviceName::new(name).map_err(UsageError::InvalidName)?;
        let session = SessionConfig::default()
            .with_settle(Duration::from_millis(parsed.settle_ms))
            .with_capture_wait(Duration::from_millis(parsed.capture_wait_ms))
            .with_capture_limit(usize::try_from(parsed.capture_limit).unwrap_or(usize::MAX));

        Ok(Self {
            target: Target::new(ip, parsed.port),
            credentials: Credentials::new(user, password, enable),
            backup_dir,
            device,
            days: parsed.days,
            session,
            connect_timeout: Duration::from_secs(parsed.connect_timeout),
            strict_host_keys: parsed.strict_host_keys,
        })
    }
}

/// Builds the diagnostic verbosity from `-v` and the `--info` / `--debug`
/// token lists. Tokens are applied after the `-v` level, in order.
pub fn verbosity_config(parsed: &ParsedArgs) -> Result<VerbosityConfig, UsageError> {
    let mut config = VerbosityConfig::from_verbose_level(parsed.verbose);
    for (option, values) in [("--info", &parsed.info), ("--debug", &parsed.debug)] {
        for token in values.iter().flat_map(|value| value.split(',')) {
            let token = token.trim();
            let applied = if option == "--info" {
                config.apply_info_flag(token)
            } else {
                config.apply_debug_flag(token)
            };
            applied.map_err(|reason| UsageError::Verbosity {
                option,
                token: token.to_owned(),
                reason,
            })?;
        }
    }
    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

fn ask<P>(prompt: &mut P, what: &'static str, label: &str) -> Result<Option<String>, UsageError>
where
    P: FnMut(&str) -> io::Result<Option<String>>,
{
    prompt(label)
        .map(non_empty)
        .map_err(|source| UsageError::Prompt { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments::parse_args;

    fn parsed(args: &[&str]) -> ParsedArgs {
        let mut full = vec!["cfgvault"];
        full.extend_from_slice(args);
        parse_args(full).expect("arguments parse")
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn no_prompt(_: &str) -> io::Result<Option<String>> {
        Ok(None)
    }

    const COMPLETE: &[&str] = &[
        "--ip",
        "10.0.0.1",
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
    ];

    #[test]
    fn complete_command_line_resolves() {
        let options = JobOptions::resolve(parsed(COMPLETE), no_env, no_prompt).expect("resolves");
        assert_eq!(options.target.to_string(), "10.0.0.1:22");
        assert_eq!(options.credentials.username, "admin");
        assert_eq!(options.credentials.password.expose(), "pw");
        assert_eq!(options.credentials.enable_secret.expose(), "en");
        assert_eq!(options.device.as_str(), "core-sw1");
        assert_eq!(options.backup_dir, PathBuf::from("/srv/backups"));
        assert_eq!(options.days, 30);
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert_eq!(options.session.settle(), Duration::from_millis(500));
        assert_eq!(options.session.capture_limit(), 999_999);
    }

    #[test]
    fn missing_options_are_listed_in_order() {
        let error = JobOptions::resolve(parsed(&["--ip", "10.0.0.1"]), no_env, no_prompt)
            .expect_err("incomplete");
        assert_eq!(
            error.to_string(),
            "missing required option(s): --user, --password, --enable, --backup-dir, --name"
        );
    }

    #[test]
    fn environment_supplies_omitted_secrets() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--backup-dir", "/b", "--name", "r1",
        ]);
        let env = |key: &str| match key {
            PASSWORD_ENV => Some("env-pw".to_owned()),
            ENABLE_ENV => Some("env-en".to_owned()),
            _ => None,
        };
        let options = JobOptions::resolve(args, env, no_prompt).expect("resolves");
        assert_eq!(options.credentials.password.expose(), "env-pw");
        assert_eq!(options.credentials.enable_secret.expose(), "env-en");
    }

    #[test]
    fn flags_win_over_environment() {
        let env = |_: &str| Some("from-env".to_owned());
        let options = JobOptions::resolve(parsed(COMPLETE), env, no_prompt).expect("resolves");
        assert_eq!(options.credentials.password.expose(), "pw");
        assert_eq!(options.credentials.enable_secret.expose(), "en");
    }

    #[test]
    fn empty_values_count_as_missing() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--password", "", "--enable", "en",
            "--backup-dir", "/b", "--name", "r1",
        ]);
        let env = |_: &str| Some(String::new());
        let error = JobOptions::resolve(args, env, no_prompt).expect_err("empty password");
        assert!(matches!(error, UsageError::Missing(ref list) if list == &["--password"]));
    }

    #[test]
    fn explicit_empty_enable_is_accepted() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--password", "pw", "--enable", "",
            "--backup-dir", "/b", "--name", "r1",
        ]);
        let env = |_: &str| Some("ignored".to_owned());
        let options = JobOptions::resolve(args, env, no_prompt).expect("resolves");
        assert!(options.credentials.enable_secret.is_empty());
    }

    #[test]
    fn empty_enable_from_environment_still_counts_as_missing() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--password", "pw", "--backup-dir", "/b",
            "--name", "r1",
        ]);
        let env = |key: &str| (key == ENABLE_ENV).then(String::new);
        let error = JobOptions::resolve(args, env, no_prompt).expect_err("no enable secret");
        assert!(matches!(error, UsageError::Missing(ref list) if list == &["--enable"]));
    }

    #[test]
    fn verbosity_tokens_layer_over_verbose_level() {
        use logging::{DebugFlag, InfoFlag};

        let config = verbosity_config(&parsed(&["-v", "--info", "prune2,session0", "--debug", "io2"]))
            .expect("known tokens");
        assert_eq!(config.info.get(InfoFlag::Prune), 2);
        assert_eq!(config.info.get(InfoFlag::Session), 0);
        assert_eq!(config.info.get(InfoFlag::Archive), 1);
        assert_eq!(config.debug.get(DebugFlag::Io), 2);
        assert_eq!(config.debug.get(DebugFlag::Cmd), 0);
    }

    #[test]
    fn unknown_verbosity_token_is_a_usage_error() {
        let error = verbosity_config(&parsed(&["--debug", "cmd,delta"])).expect_err("unknown");
        assert_eq!(
            error.to_string(),
            "invalid --debug flag 'delta': unknown debug flag: delta"
        );
        assert!(verbosity_config(&parsed(&["--info", "prune,"])).is_err());
    }

    #[test]
    fn prompt_fills_secrets_only_when_everything_else_is_present() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--backup-dir", "/b", "--name", "r1",
        ]);
        let mut asked = Vec::new();
        let options = JobOptions::resolve(args, no_env, |label: &str| {
            asked.push(label.to_owned());
            Ok(Some(format!("typed-{}", asked.len())))
        })
        .expect("resolves");
        assert_eq!(asked, ["Password: ", "Enable secret: "]);
        assert_eq!(options.credentials.password.expose(), "typed-1");
        assert_eq!(options.credentials.enable_secret.expose(), "typed-2");

        let mut called = false;
        let error = JobOptions::resolve(parsed(&["--ip", "10.0.0.1"]), no_env, |_: &str| {
            called = true;
            Ok(Some("x".to_owned()))
        })
        .expect_err("incomplete");
        assert!(!called);
        assert!(matches!(error, UsageError::Missing(_)));
    }

    #[test]
    fn prompt_failure_is_reported() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--backup-dir", "/b", "--name", "r1",
        ]);
        let error = JobOptions::resolve(args, no_env, |_: &str| {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "no tty"))
        })
        .expect_err("prompt fails");
        assert!(matches!(error, UsageError::Prompt { what: "password", .. }));
    }

    #[test]
    fn unusable_device_name_is_rejected() {
        let args = parsed(&[
            "--ip", "10.0.0.1", "--user", "admin", "--password", "pw", "--enable", "en",
            "--backup-dir", "/b", "--name", "../etc",
        ]);
        let error = JobOptions::resolve(args, no_env, no_prompt).expect_err("bad name");
        assert!(matches!(error, UsageError::InvalidName(_)));
        assert!(error.to_string().starts_with("invalid --name:"));
    }

    #[test]
    fn tunables_flow_into_session_config() {
        let mut args = COMPLETE.to_vec();
        args.extend_from_slice(&[
            "--port", "2222", "--days", "7", "--settle-ms", "0", "--capture-wait-ms", "50",
            "--capture-limit", "4096", "--connect-timeout", "3", "--strict-host-keys",
        ]);
        let options = JobOptions::resolve(parsed(&args), no_env, no_prompt).expect("resolves");
        assert_eq!(options.target.port, 2222);
        assert_eq!(options.days, 7);
        assert_eq!(options.session.settle(), Duration::ZERO);
        assert_eq!(options.session.capture_wait(), Duration::from_millis(50));
        assert_eq!(options.session.capture_limit(), 4096);
        assert_eq!(options.connect_timeout, Duration::from_secs(3));
        assert!(options.strict_host_keys);
    }
}
