use std::cell::RefCell;
use tracing::{debug, info};

/// The two logging hooks preparation steps report through.
///
/// Messages are observational only; no step branches on them.
pub trait PrepareLog {
    fn info(&self, msg: &str);

    fn debug(&self, msg: &str);
}

/// Forwards to the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl PrepareLog for TracingLog {
    fn info(&self, msg: &str) {
        info!("{msg}");
    }

    fn debug(&self, msg: &str) {
        debug!("{msg}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Debug,
}

/// Records every message in memory, for assertions in tests.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: RefCell<Vec<(LogLevel, String)>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl PrepareLog for MemoryLog {
    fn info(&self, msg: &str) {
        self.entries
            .borrow_mut()
            .push((LogLevel::Info, msg.to_owned()));
    }

    fn debug(&self, msg: &str) {
        self.entries
            .borrow_mut()
            .push((LogLevel::Debug, msg.to_owned()));
    }
}
