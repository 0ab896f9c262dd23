//! Identifier types for logs, entries, and positions.

use std::fmt;

/// Unique identifier for a log segment.
///
/// Log IDs are allocated monotonically by a store and never reused
/// within that store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogId(pub u64);

impl LogId {
    /// Creates a new log ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log:{}", self.0)
    }
}

/// Zero-based index of an entry within a log.
///
/// Entry IDs are dense: the first appended entry is `0`, the second `1`,
/// and so on, with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub u64);

impl EntryId {
    /// Creates a new entry ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Returns the next entry ID.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry:{}", self.0)
    }
}

/// Totally ordered locator of an entry within a store.
///
/// Positions order first by log, then by entry within the log. Because log
/// IDs are allocated monotonically, this matches append order across
/// segments of one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// The log containing the entry.
    pub log_id: LogId,
    /// The entry's index within the log.
    pub entry_id: EntryId,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(log_id: LogId, entry_id: EntryId) -> Self {
        Self { log_id, entry_id }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.log_id.as_u64(), self.entry_id.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_next() {
        let e = EntryId::new(5);
        assert_eq!(e.next().as_u64(), 6);
    }

    #[test]
    fn position_ordering_within_log() {
        let log = LogId::new(1);
        let p1 = Position::new(log, EntryId::new(3));
        let p2 = Position::new(log, EntryId::new(7));
        assert!(p1 < p2);
    }

    #[test]
    fn position_ordering_across_logs() {
        let p1 = Position::new(LogId::new(1), EntryId::new(100));
        let p2 = Position::new(LogId::new(2), EntryId::new(0));
        assert!(p1 < p2);
    }

    #[test]
    fn position_display() {
        let p = Position::new(LogId::new(4), EntryId::new(9));
        assert_eq!(format!("{p}"), "4:9");
    }
}
