//! Test fixtures and topic harnesses.
//!
//! Provides convenience helpers for setting up test topics over either
//! store implementation and reading compacted outputs back.

use keyfold_core::{
    CompactionConfig, CoreResult, LogId, Position, TopicClient, TopicDirectory, TwoPhaseCompactor,
};
use keyfold_storage::{EntryId, FileLogStore, InMemoryLogStore, LogStore, StorageError};
use std::sync::Arc;
use tempfile::TempDir;

/// A test topic with its store, directory, and compactor wired together.
pub struct TestTopic {
    /// The backing log store.
    pub store: Arc<dyn LogStore>,
    /// The topic directory over the store.
    pub topics: Arc<TopicDirectory>,
    /// A compactor over the same store and directory.
    pub compactor: TwoPhaseCompactor,
    name: String,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestTopic {
    /// Creates a topic backed by an in-memory store.
    pub async fn memory(name: &str) -> Self {
        let store: Arc<dyn LogStore> = Arc::new(InMemoryLogStore::new());
        Self::over(store, name, None).await
    }

    /// Creates a topic backed by a file store in a temporary directory.
    pub async fn file(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let store: Arc<dyn LogStore> =
            Arc::new(FileLogStore::open(temp_dir.path()).expect("failed to open file store"));
        Self::over(store, name, Some(temp_dir)).await
    }

    async fn over(store: Arc<dyn LogStore>, name: &str, temp_dir: Option<TempDir>) -> Self {
        let topics = Arc::new(TopicDirectory::new(Arc::clone(&store)));
        topics
            .create_topic(name)
            .await
            .expect("failed to create topic");

        let compactor = TwoPhaseCompactor::new(
            Arc::clone(&store),
            Arc::clone(&topics) as Arc<dyn TopicClient>,
            CompactionConfig::default(),
        );

        Self {
            store,
            topics,
            compactor,
            name: name.to_string(),
            _temp_dir: temp_dir,
        }
    }

    /// Returns the topic's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Publishes a keyed entry to the topic.
    pub async fn publish(&self, key: &str, payload: &[u8]) -> Position {
        self.topics
            .publish(&self.name, key, payload)
            .await
            .expect("publish failed")
    }

    /// Publishes a keyless entry to the topic.
    pub async fn publish_unkeyed(&self, payload: &[u8]) -> Position {
        self.topics
            .publish_unkeyed(&self.name, payload)
            .await
            .expect("publish failed")
    }

    /// Compacts the topic.
    pub async fn compact(&self) -> CoreResult<LogId> {
        self.compactor.compact(&self.name).await
    }

    /// Reads a compacted output back as `(key, payload)` pairs in entry
    /// order, asserting that the log is sealed and its entry count is
    /// stable.
    pub async fn compacted_entries(&self, log: LogId) -> Vec<(String, Vec<u8>)> {
        // A sealed log rejects appends; that is the store-agnostic seal
        // check.
        let sealed = matches!(
            self.store.append(log, b"probe").await,
            Err(StorageError::LogSealed { .. })
        );
        assert!(sealed, "compacted output must be sealed");

        let Some(last) = self.store.last_confirmed(log).await.expect("log missing") else {
            return Vec::new();
        };
        let entries = self
            .store
            .read(log, EntryId::new(0), last)
            .await
            .expect("read failed");
        assert_eq!(entries.len() as u64, last.as_u64() + 1);

        entries
            .iter()
            .map(|(_, bytes)| {
                let decoded = keyfold_codec::decode(bytes).expect("undecodable output entry");
                (
                    decoded.key.expect("compacted entry without key"),
                    decoded.payload,
                )
            })
            .collect()
    }
}
