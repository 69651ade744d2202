//! crates/logging/src/config.rs
//! Verbosity configuration combining info and debug levels.

use super::levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};

/// Combined verbosity configuration for info and debug flags.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Info flag levels.
    pub info: InfoLevels,
    /// Debug flag levels.
    pub debug: DebugLevels,
}

impl VerbosityConfig {
    /// Create a new configuration from the number of `-v` flags (0-3).
    ///
    /// Level 0 keeps the diagnostic stream silent so only status lines reach
    /// the operator. Each additional `-v` layers more detail on top.
    pub fn from_verbose_level(level: u8) -> Self {
        let mut config = Self::default();

        if level >= 1 {
            config.info.set_all(1);
        }
        if level >= 2 {
            config.info.session = 2;
            config.debug.connect = 1;
            config.debug.cmd = 1;
        }
        if level >= 3 {
            config.info.set_all(2);
            config.debug.set_all(2);
        }

        config
    }

    /// Apply a single info flag token (e.g., "session2", "prune").
    pub fn apply_info_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        let flag = match name {
            "connect" => InfoFlag::Connect,
            "session" => InfoFlag::Session,
            "archive" => InfoFlag::Archive,
            "prune" => InfoFlag::Prune,
            _ => return Err(format!("unknown info flag: {name}")),
        };

        self.info.set(flag, level);
        Ok(())
    }

    /// Apply a single debug flag token (e.g., "io2", "cmd").
    pub fn apply_debug_flag(&mut self, token: &str) -> Result<(), String> {
        let (name, level) = parse_flag_token(token)?;

        let flag = match name {
            "connect" => DebugFlag::Connect,
            "cmd" => DebugFlag::Cmd,
            "io" => DebugFlag::Io,
            "timing" => DebugFlag::Timing,
            _ => return Err(format!("unknown debug flag: {name}")),
        };

        self.debug.set(flag, level);
        Ok(())
    }
}

/// Parse a flag token like "io2" into ("io", 2) or "cmd" into ("cmd", 1).
fn parse_flag_token(token: &str) -> Result<(&str, u8), String> {
    if token.is_empty() {
        return Err("empty flag token".to_string());
    }

    match token.find(|c: char| c.is_ascii_digit()) {
        Some(pos) => {
            let name = &token[..pos];
            let level = token[pos..]
                .parse::<u8>()
                .map_err(|_| format!("invalid level in flag: {token}"))?;
            Ok((name, level))
        }
        None => Ok((token, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_silent() {
        let config = VerbosityConfig::from_verbose_level(0);
        assert_eq!(config.info.get(InfoFlag::Session), 0);
        assert_eq!(config.debug.get(DebugFlag::Cmd), 0);
    }

    #[test]
    fn level_two_enables_command_echo() {
        let config = VerbosityConfig::from_verbose_level(2);
        assert_eq!(config.info.get(InfoFlag::Session), 2);
        assert_eq!(config.debug.get(DebugFlag::Cmd), 1);
        assert_eq!(config.debug.get(DebugFlag::Io), 0);
    }

    #[test]
    fn high_levels_saturate() {
        let config = VerbosityConfig::from_verbose_level(9);
        assert_eq!(config.debug.get(DebugFlag::Io), 2);
        assert_eq!(config.info.get(InfoFlag::Prune), 2);
    }

    #[test]
    fn parse_flag_token_defaults_to_level_one() {
        assert_eq!(parse_flag_token("cmd"), Ok(("cmd", 1)));
        assert_eq!(parse_flag_token("io3"), Ok(("io", 3)));
        assert!(parse_flag_token("").is_err());
        assert!(parse_flag_token("io999").is_err());
    }

    #[test]
    fn apply_flags_rejects_unknown_names() {
        let mut config = VerbosityConfig::default();
        assert!(config.apply_info_flag("archive2").is_ok());
        assert_eq!(config.info.archive, 2);
        assert!(config.apply_debug_flag("delta").is_err());
    }
}
