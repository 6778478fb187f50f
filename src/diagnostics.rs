use log::Level;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Maximum number of entries retained by a [`LogBuffer`]
pub const LOG_BUFFER_CAPACITY: usize = 100;

/// Sink for progress and diagnostic messages emitted during a run.
///
/// The analysis core never logs through global state; callers hand it a sink.
pub trait Diagnostics {
    fn log(&self, level: Level, message: &str);

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }
}

/// Forwards every message to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl Diagnostics for LogSink {
    fn log(&self, level: Level, message: &str) {
        ::log::log!(level, "{}", message);
    }
}

/// A single buffered diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub level: Level,
    pub message: String,
}

/// Keeps the most recent messages, newest first, and forwards them to `log`.
#[derive(Debug, Default)]
pub struct LogBuffer {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the buffered entries, newest first
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.entries.lock() {
            Ok(entries) => entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// True if any buffered message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }

    pub fn clear(&self) {
        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}

impl Diagnostics for LogBuffer {
    fn log(&self, level: Level, message: &str) {
        ::log::log!(level, "{}", message);

        let mut entries = match self.entries.lock() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push_front(LogEntry {
            level,
            message: message.to_string(),
        });
        entries.truncate(LOG_BUFFER_CAPACITY);
    }
}
