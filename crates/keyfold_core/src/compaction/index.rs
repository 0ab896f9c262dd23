//! The per-run compaction index.

use keyfold_storage::Position;
use std::collections::HashMap;

/// Mapping from key to the position of its most-recently-observed
/// occurrence.
///
/// One index instance is owned by one compaction run: created empty,
/// mutated monotonically during the scan phase (later observations
/// overwrite earlier ones), frozen before the write phase, and discarded
/// when the run completes. Being run-local, it needs no locking.
#[derive(Debug, Default)]
pub struct CompactionIndex {
    entries: HashMap<String, Position>,
}

impl CompactionIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observation of `key` at `position`, unconditionally
    /// overwriting any stored position for the key.
    ///
    /// Called once per keyed entry, in source log order; last writer wins.
    pub fn observe(&mut self, key: String, position: Position) {
        self.entries.insert(key, position);
    }

    /// Returns the stored position for a key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Position> {
        self.entries.get(key).copied()
    }

    /// Returns the number of distinct keys observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no keys have been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the index into its read-only post-scan view.
    #[must_use]
    pub fn freeze(self) -> FrozenIndex {
        let mut entries: Vec<(String, Position)> = self.entries.into_iter().collect();
        // Positions are unique per entry, so this order is total.
        entries.sort_unstable_by_key(|(_, position)| *position);
        FrozenIndex { entries }
    }
}

/// The frozen, read-only view of a completed scan.
///
/// Pairs are held in ascending order of each key's last-occurrence
/// position - the order in which the write phase materializes them.
#[derive(Debug)]
pub struct FrozenIndex {
    entries: Vec<(String, Position)>,
}

impl FrozenIndex {
    /// Returns the `(key, position)` pairs in ascending position order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Position)] {
        &self.entries
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
