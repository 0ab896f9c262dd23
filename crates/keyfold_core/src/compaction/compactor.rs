//! The two-phase compaction orchestrator.

use crate::compaction::scan::scan_to_boundary;
use crate::compaction::write::write_compacted;
use crate::config::CompactionConfig;
use crate::error::{CoreError, CoreResult};
use crate::topic::TopicClient;
use keyfold_storage::{EntryId, LogId, LogStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Compacts a topic's log into a sealed derived log holding the latest
/// payload per key.
///
/// A run is a well-defined function of a single snapshot: the source
/// log's last-confirmed position is captured once up front, the scan
/// phase indexes the last occurrence of every key up to that boundary,
/// and the write phase materializes the frozen index into a freshly
/// created output log, which is then sealed. Producers may keep
/// appending while a run is in flight; entries past the boundary are
/// invisible to it.
///
/// Each call owns its index and output log exclusively, so independent
/// topics could be compacted concurrently; serializing calls is the
/// [`crate::CompactionScheduler`]'s job.
pub struct TwoPhaseCompactor {
    store: Arc<dyn LogStore>,
    topics: Arc<dyn TopicClient>,
    config: CompactionConfig,
}

impl TwoPhaseCompactor {
    /// Creates a compactor over the given store and topic client.
    #[must_use]
    pub fn new(
        store: Arc<dyn LogStore>,
        topics: Arc<dyn TopicClient>,
        config: CompactionConfig,
    ) -> Self {
        Self {
            store,
            topics,
            config,
        }
    }

    /// Returns the compactor's configuration.
    #[must_use]
    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }

    /// Compacts the named topic and returns the sealed output log's
    /// identifier.
    ///
    /// Side effects of a successful call: exactly one new sealed log. On
    /// failure after the output log was created, the abandoned output is
    /// removed (best-effort) and never sealed; the source log is never
    /// mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The topic does not resolve (`TopicNotFound`)
    /// - The topic has no entries at the captured boundary (`EmptyTopic`)
    /// - An entry fails its integrity check (`Codec`)
    /// - The store fails (`Storage`)
    pub async fn compact(&self, topic: &str) -> CoreResult<LogId> {
        let source = self.topics.resolve(topic).await?;

        // The snapshot boundary is captured exactly once, before any
        // other work; everything after this is a function of it.
        let boundary = match self.store.last_confirmed(source).await? {
            Some(boundary) => boundary,
            None => return Err(CoreError::empty_topic(topic)),
        };
        debug!(topic, source = %source, boundary = %boundary, "compaction run starting");

        let output = self.store.create_log().await?;
        match self.run_phases(source, boundary, output).await {
            Ok(written) => {
                info!(topic, source = %source, output = %output, keys = written, "compaction run complete");
                Ok(output)
            }
            Err(e) => {
                self.abandon(output).await;
                Err(e)
            }
        }
    }

    /// Runs both phases against a fixed boundary and seals the output.
    ///
    /// The scan must fully complete (index frozen) before the write phase
    /// starts; interleaving them would let the write phase observe a
    /// stale set of last occurrences.
    async fn run_phases(
        &self,
        source: LogId,
        boundary: EntryId,
        output: LogId,
    ) -> CoreResult<u64> {
        let batch = self.config.read_batch_size;
        let index = scan_to_boundary(&self.store, source, boundary, batch).await?;
        let frozen = index.freeze();

        let written = write_compacted(&self.store, source, &frozen, output, batch).await?;
        self.store.seal(output).await?;
        Ok(written)
    }

    /// Discards an output log from a failed run so it is never surfaced
    /// as a usable result.
    async fn abandon(&self, output: LogId) {
        if let Err(e) = self.store.remove_log(output).await {
            warn!(output = %output, error = %e, "failed to remove abandoned output log");
        }
    }
}
