//! crates/cli/src/diagnostics.rs
//! Rendering of buffered diagnostic events to stderr.

use std::io::Write;

/// Writes every buffered diagnostic event to `stderr`, one per line.
///
/// Returns the number of events written.
pub fn flush_diagnostics<W: Write + ?Sized>(stderr: &mut W) -> usize {
    let events = logging::drain_events();
    for event in &events {
        let _ = writeln!(stderr, "{}", event.render());
    }
    events.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::{InfoFlag, VerbosityConfig, emit_info, init};

    #[test]
    fn drains_buffered_events_once() {
        init(VerbosityConfig::from_verbose_level(1));
        emit_info(InfoFlag::Archive, 1, "wrote r1_010124.conf".to_owned());

        let mut stderr = Vec::new();
        assert_eq!(flush_diagnostics(&mut stderr), 1);
        assert_eq!(
            String::from_utf8(stderr).expect("utf8"),
            "cfgvault info: wrote r1_010124.conf\n"
        );

        let mut again = Vec::new();
        assert_eq!(flush_diagnostics(&mut again), 0);
        assert!(again.is_empty());
    }
}
