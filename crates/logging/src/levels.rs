//! crates/logging/src/levels.rs
//! Flag enums and level structures for info and debug verbosity.

/// Info flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InfoFlag {
    /// Connection establishment and shell setup.
    Connect,
    /// Session automaton state transitions.
    Session,
    /// Archive file writes.
    Archive,
    /// Retention pruning.
    Prune,
}

/// Debug flags for diagnostic categories.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DebugFlag {
    /// Transport-level connection details.
    Connect,
    /// Commands written to the remote shell.
    Cmd,
    /// Raw channel reads and drains.
    Io,
    /// Settle and quiescence waits.
    Timing,
}

/// Info verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InfoLevels {
    /// Connection establishment level.
    pub connect: u8,
    /// Session transition level.
    pub session: u8,
    /// Archive write level.
    pub archive: u8,
    /// Retention pruning level.
    pub prune: u8,
}

impl InfoLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: InfoFlag) -> u8 {
        match flag {
            InfoFlag::Connect => self.connect,
            InfoFlag::Session => self.session,
            InfoFlag::Archive => self.archive,
            InfoFlag::Prune => self.prune,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: InfoFlag, level: u8) {
        match flag {
            InfoFlag::Connect => self.connect = level,
            InfoFlag::Session => self.session = level,
            InfoFlag::Archive => self.archive = level,
            InfoFlag::Prune => self.prune = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.connect = level;
        self.session = level;
        self.archive = level;
        self.prune = level;
    }
}

/// Debug verbosity levels for each flag.
#[derive(Clone, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLevels {
    /// Transport connection level.
    pub connect: u8,
    /// Command echo level.
    pub cmd: u8,
    /// Channel I/O level.
    pub io: u8,
    /// Timing level.
    pub timing: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Connect => self.connect,
            DebugFlag::Cmd => self.cmd,
            DebugFlag::Io => self.io,
            DebugFlag::Timing => self.timing,
        }
    }

    /// Set the level for a specific flag.
    pub fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Connect => self.connect = level,
            DebugFlag::Cmd => self.cmd = level,
            DebugFlag::Io => self.io = level,
            DebugFlag::Timing => self.timing = level,
        }
    }

    /// Set all flags to the specified level.
    pub fn set_all(&mut self, level: u8) {
        self.connect = level;
        self.cmd = level;
        self.io = level;
        self.timing = level;
    }
}
