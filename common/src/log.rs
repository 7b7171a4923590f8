//! Event log with levels and timestamps.
//!
//! The pendant keeps the last few events in a ring buffer owned by the
//! [`Pendant`](crate::pendant::Pendant) context, so there is no global state and
//! no locking. Hosts drain new entries with [`EventLog::since`] (the simulator
//! prints them to stdout). With the `defmt` feature enabled every pushed line is
//! also forwarded to `defmt` at the matching level.
//!
//! # Log Levels
//!
//! - `Trace`: verbose debugging
//! - `Debug`: emitted commands
//! - `Info`: screen transitions, button actions
//! - `Warn`: render cache degradation
//! - `Error`: errors
//!
//! # Usage
//!
//! ```ignore
//! log_info!(self.log, now_ms, "screen {}", screen.name());
//! log_warn!(self.log, now_ms, "cache unavailable: {} bytes free", free);
//! ```

use heapless::{Deque, String};

/// Maximum number of log entries to keep.
pub const LOG_ENTRIES: usize = 16;

/// Maximum characters per log message.
pub const LOG_MSG_LEN: usize = 48;

/// Log severity level.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LogLevel {
    /// Verbose debugging
    Trace = 0,
    /// Debug information
    Debug = 1,
    /// Normal operation
    #[default]
    Info = 2,
    /// Warnings
    Warn = 3,
    /// Errors
    Error = 4,
}

impl LogLevel {
    /// Get the single-character prefix for this level.
    pub const fn prefix(self) -> char {
        match self {
            Self::Trace => 'T',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
        }
    }
}

/// A single log entry with level, message, and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    /// Log severity level.
    pub level: LogLevel,
    /// Log message (truncated to `LOG_MSG_LEN`).
    pub message: String<LOG_MSG_LEN>,
    /// Loop timestamp in milliseconds.
    pub timestamp_ms: u64,
}

impl LogEntry {
    /// Create a new log entry, truncating the message on a char boundary.
    pub fn new(
        level: LogLevel,
        message: &str,
        timestamp_ms: u64,
    ) -> Self {
        let mut msg: String<LOG_MSG_LEN> = String::new();
        for c in message.chars() {
            if msg.push(c).is_err() {
                break;
            }
        }
        Self {
            level,
            message: msg,
            timestamp_ms,
        }
    }
}

/// Ring buffer of log entries. Oldest entries are dropped when full.
pub struct EventLog {
    entries: Deque<LogEntry, LOG_ENTRIES>,
    /// Total entries ever pushed; doubles as the sequence number of the next entry.
    pushed: u32,
}

impl EventLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            pushed: 0,
        }
    }

    /// Push an entry at `level`.
    pub fn push(
        &mut self,
        level: LogLevel,
        message: &str,
        timestamp_ms: u64,
    ) {
        forward(level, message);
        if self.entries.is_full() {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry::new(level, message, timestamp_ms)).ok();
        self.pushed = self.pushed.wrapping_add(1);
    }

    /// Sequence number the next pushed entry will get.
    #[inline]
    pub const fn next_seq(&self) -> u32 { self.pushed }

    /// Entries pushed at or after sequence `seq` that are still buffered, oldest first.
    pub fn since(
        &self,
        seq: u32,
    ) -> impl Iterator<Item = &LogEntry> {
        let newer = self.pushed.wrapping_sub(seq) as usize;
        let skip = self.entries.len().saturating_sub(newer);
        self.entries.iter().skip(skip)
    }

    /// Iterate over all buffered entries (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> { self.entries.iter() }

    /// Most recent entry.
    pub fn last(&self) -> Option<&LogEntry> { self.entries.back() }

    /// Number of buffered entries.
    #[inline]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Check if the log is empty.
    #[inline]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl Default for EventLog {
    fn default() -> Self { Self::new() }
}

#[cfg(feature = "defmt")]
fn forward(
    level: LogLevel,
    message: &str,
) {
    match level {
        LogLevel::Trace => defmt::trace!("{=str}", message),
        LogLevel::Debug => defmt::debug!("{=str}", message),
        LogLevel::Info => defmt::info!("{=str}", message),
        LogLevel::Warn => defmt::warn!("{=str}", message),
        LogLevel::Error => defmt::error!("{=str}", message),
    }
}

#[cfg(not(feature = "defmt"))]
#[inline]
const fn forward(
    _level: LogLevel,
    _message: &str,
) {
}

/// Format a message into `$log` at an explicit level.
#[macro_export]
macro_rules! log_at {
    ($log:expr, $level:expr, $now:expr, $($arg:tt)*) => {{
        use core::fmt::Write as _;
        let mut buf: heapless::String<{ $crate::log::LOG_MSG_LEN }> = heapless::String::new();
        let _ = write!(buf, $($arg)*);
        $log.push($level, buf.as_str(), $now);
    }};
}

/// Log a message at Debug level.
#[macro_export]
macro_rules! log_debug {
    ($log:expr, $now:expr, $($arg:tt)*) => {
        $crate::log_at!($log, $crate::log::LogLevel::Debug, $now, $($arg)*)
    };
}

/// Log a message at Info level.
#[macro_export]
macro_rules! log_info {
    ($log:expr, $now:expr, $($arg:tt)*) => {
        $crate::log_at!($log, $crate::log::LogLevel::Info, $now, $($arg)*)
    };
}

/// Log a message at Warn level.
#[macro_export]
macro_rules! log_warn {
    ($log:expr, $now:expr, $($arg:tt)*) => {
        $crate::log_at!($log, $crate::log::LogLevel::Warn, $now, $($arg)*)
    };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_push() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.push(LogLevel::Info, "started", 0);
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|e| e.message.as_str()), Some("started"));
    }

    #[test]
    fn test_event_log_ring_buffer() {
        let mut log = EventLog::new();
        for i in 0..=LOG_ENTRIES {
            log_info!(log, i as u64, "entry {}", i);
        }
        assert_eq!(log.len(), LOG_ENTRIES);
        let first = log.iter().next().map(|e| e.message.as_str());
        assert_eq!(first, Some("entry 1"));
    }

    #[test]
    fn test_event_log_since_returns_only_new_entries() {
        let mut log = EventLog::new();
        log.push(LogLevel::Info, "a", 0);
        let seq = log.next_seq();
        log.push(LogLevel::Warn, "b", 1);
        log.push(LogLevel::Debug, "c", 2);

        let new: std::vec::Vec<&str> = log.since(seq).map(|e| e.message.as_str()).collect();
        assert_eq!(new, ["b", "c"]);
        assert_eq!(log.since(log.next_seq()).count(), 0);
    }

    #[test]
    fn test_event_log_truncation() {
        let mut log = EventLog::new();
        log_warn!(log, 5, "{}", "x".repeat(LOG_MSG_LEN * 2));
        // An oversized write fails as a whole; the entry is still recorded.
        assert_eq!(log.len(), 1);

        let entry = LogEntry::new(LogLevel::Info, &"y".repeat(LOG_MSG_LEN + 10), 0);
        assert_eq!(entry.message.len(), LOG_MSG_LEN);
    }

    #[test]
    fn test_level_prefix_and_default() {
        assert_eq!(LogLevel::Warn.prefix(), 'W');
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
