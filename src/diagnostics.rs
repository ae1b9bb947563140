//! Leveled diagnostics emitted while processing.
//!
//! Operations never surface their faults to the caller beyond a success flag, the diagnostics
//! stream is where the details end up.

use log::Level;

/// A sink for leveled diagnostic messages, owned by a [crate::DataProcessor].
pub trait Diagnostics {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message)
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message)
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message)
    }
}

/// Forward every message to the [log] facade.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn log(&self, level: Level, message: &str) {
        log::log!(target: "customer_analytics", level, "{}", message);
    }
}

/// Record every message, for later inspection.
#[derive(Clone, Debug, Default)]
pub struct MemoryDiagnostics {
    entries: std::cell::RefCell<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    /// Messages logged at exactly the given level.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn log(&self, level: Level, message: &str) {
        self.entries.borrow_mut().push((level, message.to_owned()));
    }
}
