//! Compaction configuration.

/// Configuration for compaction runs.
#[derive(Debug, Clone)]
pub struct CompactionConfig {
    /// Number of entries fetched per store read while scanning.
    pub read_batch_size: usize,

    /// Maximum number of queued compaction jobs before the scheduler
    /// rejects new submissions.
    pub max_pending_compactions: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            read_batch_size: 100,
            max_pending_compactions: 16,
        }
    }
}

impl CompactionConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of entries fetched per store read.
    #[must_use]
    pub const fn read_batch_size(mut self, size: usize) -> Self {
        self.read_batch_size = size;
        self
    }

    /// Sets the scheduler queue bound.
    #[must_use]
    pub const fn max_pending_compactions(mut self, limit: usize) -> Self {
        self.max_pending_compactions = limit;
        self
    }
}
