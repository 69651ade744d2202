//! crates/logging/src/thread_local.rs
//! Thread-local storage for verbosity configuration and event collection.

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use std::cell::RefCell;

thread_local! {
    static VERBOSITY: RefCell<VerbosityConfig> = RefCell::new(VerbosityConfig::default());
    #[allow(clippy::missing_const_for_thread_local)]
    static EVENTS: RefCell<Vec<DiagnosticEvent>> = RefCell::new(Vec::new());
}

/// Diagnostic event collected during execution.
#[derive(Clone, Debug)]
pub enum DiagnosticEvent {
    /// Info-level diagnostic event.
    Info {
        /// The info flag category.
        flag: InfoFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
    /// Debug-level diagnostic event.
    Debug {
        /// The debug flag category.
        flag: DebugFlag,
        /// The verbosity level.
        level: u8,
        /// The diagnostic message.
        message: String,
    },
}

impl DiagnosticEvent {
    /// Returns the message carried by the event.
    pub fn message(&self) -> &str {
        match self {
            Self::Info { message, .. } | Self::Debug { message, .. } => message,
        }
    }

    /// Renders the event as a single diagnostic line without a trailing newline.
    pub fn render(&self) -> String {
        match self {
            Self::Info { message, .. } => format!("cfgvault info: {message}"),
            Self::Debug { flag, message, .. } => {
                format!("cfgvault debug[{}]: {message}", debug_label(*flag))
            }
        }
    }
}

const fn debug_label(flag: DebugFlag) -> &'static str {
    match flag {
        DebugFlag::Connect => "connect",
        DebugFlag::Cmd => "cmd",
        DebugFlag::Io => "io",
        DebugFlag::Timing => "timing",
    }
}

/// Initialize verbosity configuration for the current thread.
pub fn init(config: VerbosityConfig) {
    VERBOSITY.with(|v| {
        *v.borrow_mut() = config;
    });
}

/// Check if the info flag is at or above the specified level.
pub fn info_gte(flag: InfoFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().info.get(flag) >= level)
}

/// Check if the debug flag is at or above the specified level.
pub fn debug_gte(flag: DebugFlag, level: u8) -> bool {
    VERBOSITY.with(|v| v.borrow().debug.get(flag) >= level)
}

/// Emit an info diagnostic event.
pub fn emit_info(flag: InfoFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Info {
            flag,
            level,
            message,
        });
    });
}

/// Emit a debug diagnostic event.
pub fn emit_debug(flag: DebugFlag, level: u8, message: String) {
    EVENTS.with(|e| {
        e.borrow_mut().push(DiagnosticEvent::Debug {
            flag,
            level,
            message,
        });
    });
}

/// Drain all collected events, clearing the internal buffer.
pub fn drain_events() -> Vec<DiagnosticEvent> {
    EVENTS.with(|e| e.borrow_mut().drain(..).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_and_check() {
        let mut config = VerbosityConfig::default();
        config.info.session = 2;
        config.debug.io = 3;

        init(config);

        assert!(info_gte(InfoFlag::Session, 1));
        assert!(info_gte(InfoFlag::Session, 2));
        assert!(!info_gte(InfoFlag::Session, 3));

        assert!(debug_gte(DebugFlag::Io, 3));
        assert!(!debug_gte(DebugFlag::Io, 4));
    }

    #[test]
    fn emit_and_drain_preserves_order() {
        init(VerbosityConfig::default());
        drain_events();

        emit_info(InfoFlag::Connect, 1, "first".to_string());
        emit_debug(DebugFlag::Cmd, 1, "second".to_string());

        let events = drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message(), "first");
        assert_eq!(events[1].message(), "second");
        assert!(drain_events().is_empty());
    }

    #[test]
    fn render_prefixes_by_kind() {
        let info = DiagnosticEvent::Info {
            flag: InfoFlag::Archive,
            level: 1,
            message: "wrote archive".to_string(),
        };
        assert_eq!(info.render(), "cfgvault info: wrote archive");

        let debug = DiagnosticEvent::Debug {
            flag: DebugFlag::Timing,
            level: 2,
            message: "settled 500ms".to_string(),
        };
        assert_eq!(debug.render(), "cfgvault debug[timing]: settled 500ms");
    }

    #[test]
    fn reinit_overwrites_config() {
        let mut config = VerbosityConfig::default();
        config.info.prune = 5;
        init(config);
        assert!(info_gte(InfoFlag::Prune, 5));

        init(VerbosityConfig::default());
        assert!(!info_gte(InfoFlag::Prune, 1));
    }
}
