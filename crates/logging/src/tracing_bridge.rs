//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the cfgvault verbosity system.
//!
//! [`VerbosityLayer`] is a `tracing-subscriber` layer that maps each event's
//! target onto an info or debug flag, consults the thread-local
//! [`VerbosityConfig`], and records the surviving events in the thread-local
//! buffer drained by [`drain_events`](crate::drain_events). Events whose
//! target does not belong to a known category are ignored.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::info!(target: "cfgvault::session", "entering CAPTURING");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that bridges tracing events to the verbosity flags.
pub struct VerbosityLayer {
    _config: VerbosityConfig,
}

impl VerbosityLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match target {
            t if t.ends_with("::connect") => Some(InfoFlag::Connect),
            t if t.ends_with("::session") => Some(InfoFlag::Session),
            t if t.ends_with("::archive") => Some(InfoFlag::Archive),
            t if t.ends_with("::prune") => Some(InfoFlag::Prune),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        match target {
            t if t.ends_with("::cmd") => Some(DebugFlag::Cmd),
            t if t.ends_with("::io") => Some(DebugFlag::Io),
            t if t.ends_with("::timing") => Some(DebugFlag::Timing),
            t if t.ends_with("::transport") => Some(DebugFlag::Connect),
            _ => None,
        }
    }

    /// Map a tracing level to a verbosity level.
    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO | Level::DEBUG => 1,
            Level::TRACE => 2,
        }
    }
}

impl<S> Layer<S> for VerbosityLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.finish() {
                    emit_debug(debug_flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.finish() {
                    emit_info(info_flag, verbosity_level, message);
                }
            }
        }
    }
}

/// Collects the `message` field plus any structured fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> Option<String> {
        let mut message = self.message?;
        for field in self.fields {
            message.push(' ');
            message.push_str(&field);
        }
        Some(message)
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={value:?}", field.name()));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.fields.push(format!("{}={value}", field.name()));
        }
    }
}

/// Initialize tracing with the given verbosity configuration.
///
/// Installs a global subscriber the first time it is called; later calls only
/// refresh the calling thread's verbosity so repeated CLI runs inside one
/// process (tests, embedding) keep working.
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());

    let layer = VerbosityLayer::new(config);

    let _ = tracing_subscriber::registry().with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_targets_map_by_suffix() {
        assert_eq!(
            VerbosityLayer::target_to_info_flag("cfgvault::session"),
            Some(InfoFlag::Session)
        );
        assert_eq!(
            VerbosityLayer::target_to_info_flag("cfgvault::prune"),
            Some(InfoFlag::Prune)
        );
        assert_eq!(VerbosityLayer::target_to_info_flag("hyper::client"), None);
    }

    #[test]
    fn debug_targets_map_by_suffix() {
        assert_eq!(
            VerbosityLayer::target_to_debug_flag("cfgvault::cmd"),
            Some(DebugFlag::Cmd)
        );
        assert_eq!(
            VerbosityLayer::target_to_debug_flag("cfgvault::transport"),
            Some(DebugFlag::Connect)
        );
        assert_eq!(VerbosityLayer::target_to_debug_flag("cfgvault::session"), None);
    }

    #[test]
    fn levels_collapse_to_two_tiers() {
        assert_eq!(VerbosityLayer::level_to_verbosity_level(&Level::WARN), 1);
        assert_eq!(VerbosityLayer::level_to_verbosity_level(&Level::INFO), 1);
        assert_eq!(VerbosityLayer::level_to_verbosity_level(&Level::DEBUG), 1);
        assert_eq!(VerbosityLayer::level_to_verbosity_level(&Level::TRACE), 2);
    }

    #[test]
    fn layer_records_enabled_events_only() {
        use crate::{drain_events, init};
        use tracing_subscriber::layer::SubscriberExt;

        let mut config = VerbosityConfig::default();
        config.info.archive = 1;
        init(config.clone());
        drain_events();

        let subscriber = tracing_subscriber::registry().with(VerbosityLayer::new(config));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "cfgvault::archive", path = "a.conf", "wrote archive");
            tracing::info!(target: "cfgvault::prune", "skipped because disabled");
        });

        let events = drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message(), "wrote archive path=a.conf");
    }

    #[test]
    fn debug_events_pass_at_level_one() {
        use crate::{drain_events, init};
        use tracing_subscriber::layer::SubscriberExt;

        let config = VerbosityConfig::from_verbose_level(2);
        init(config.clone());
        drain_events();

        let subscriber = tracing_subscriber::registry().with(VerbosityLayer::new(config));
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "cfgvault::cmd", "10.0.0.1 <- \"term len 0\"");
            tracing::debug!(target: "cfgvault::io", "drained 12 bytes");
        });

        let rendered: Vec<String> = drain_events().iter().map(|event| event.render()).collect();
        assert_eq!(rendered, ["cfgvault debug[cmd]: 10.0.0.1 <- \"term len 0\""]);
    }
}
