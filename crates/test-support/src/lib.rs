//! Shared test utilities for the cfgvault workspace.
//!
//! - [`ScriptedConnector`] / [`ScriptedChannel`]: an in-memory device that
//!   replays canned output and records every byte written to it.
//! - [`ArchiveDir`]: a temporary archive directory whose files can be
//!   back-dated for retention tests.

mod archive_dir;
mod scripted;

pub use archive_dir::{ArchiveDir, DAY};
pub use scripted::{
    ConnectAttempt, Failure, ScriptedChannel, ScriptedConnection, ScriptedConnector, Transcript,
};
