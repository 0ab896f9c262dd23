//! Topic name resolution and the in-process topic directory.
//!
//! The compactor only needs one thing from the surrounding messaging
//! system: resolving a topic name to the log that backs it. That boundary
//! is the [`TopicClient`] trait. [`TopicDirectory`] is the in-process
//! implementation used by tests and embedders; it also carries the
//! producer-side `publish` helpers.

use crate::error::{CoreError, CoreResult};
use async_trait::async_trait;
use keyfold_storage::{LogId, LogStore, Position};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves topic names to their backing logs.
///
/// This is the compactor's only view of the messaging system; it is not
/// used to publish or subscribe.
#[async_trait]
pub trait TopicClient: Send + Sync {
    /// Resolves a topic name to its current backing log.
    ///
    /// # Errors
    ///
    /// Returns `TopicNotFound` if the name does not resolve.
    async fn resolve(&self, topic: &str) -> CoreResult<LogId>;
}

/// An in-process topic directory over a log store.
///
/// Maps topic names to backing logs and provides the producer side used
/// by tests, fixtures, and embedders.
pub struct TopicDirectory {
    store: Arc<dyn LogStore>,
    topics: RwLock<HashMap<String, LogId>>,
}

impl TopicDirectory {
    /// Creates a directory over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self {
            store,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a new topic backed by a fresh log.
    ///
    /// # Errors
    ///
    /// Returns `TopicExists` if the name is already taken, or a storage
    /// error if the backing log cannot be created.
    pub async fn create_topic(&self, topic: &str) -> CoreResult<LogId> {
        if self.topics.read().contains_key(topic) {
            return Err(CoreError::topic_exists(topic));
        }

        let log_id = self.store.create_log().await?;
        self.topics.write().insert(topic.to_string(), log_id);
        Ok(log_id)
    }

    /// Publishes a keyed entry to a topic.
    ///
    /// # Errors
    ///
    /// Returns `TopicNotFound` if the topic does not exist, or a storage
    /// error if the append fails.
    pub async fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> CoreResult<Position> {
        self.publish_envelope(topic, Some(key), payload).await
    }

    /// Publishes an entry without a key.
    ///
    /// Keyless entries are valid log members but are invisible to
    /// compaction.
    ///
    /// # Errors
    ///
    /// Returns `TopicNotFound` if the topic does not exist, or a storage
    /// error if the append fails.
    pub async fn publish_unkeyed(&self, topic: &str, payload: &[u8]) -> CoreResult<Position> {
        self.publish_envelope(topic, None, payload).await
    }

    async fn publish_envelope(
        &self,
        topic: &str,
        key: Option<&str>,
        payload: &[u8],
    ) -> CoreResult<Position> {
        let log_id = self.lookup(topic)?;
        let bytes = keyfold_codec::encode(key, payload);
        let entry_id = self.store.append(log_id, &bytes).await?;
        Ok(Position::new(log_id, entry_id))
    }

    fn lookup(&self, topic: &str) -> CoreResult<LogId> {
        self.topics
            .read()
            .get(topic)
            .copied()
            .ok_or_else(|| CoreError::topic_not_found(topic))
    }
}

#[async_trait]
impl TopicClient for TopicDirectory {
    async fn resolve(&self, topic: &str) -> CoreResult<LogId> {
        self.lookup(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfold_storage::{EntryId, InMemoryLogStore};

    #[tokio::test]
    async fn create_and_resolve() {
        let store = Arc::new(InMemoryLogStore::new());
        let directory = TopicDirectory::new(store);

        let log = directory.create_topic("events").await.unwrap();
        assert_eq!(directory.resolve("events").await.unwrap(), log);
    }

    #[tokio::test]
    async fn duplicate_topic_rejected() {
        let store = Arc::new(InMemoryLogStore::new());
        let directory = TopicDirectory::new(store);

        directory.create_topic("events").await.unwrap();
        let result = directory.create_topic("events").await;
        assert!(matches!(result, Err(CoreError::TopicExists { .. })));
    }

    #[tokio::test]
    async fn unknown_topic_rejected() {
        let store = Arc::new(InMemoryLogStore::new());
        let directory = TopicDirectory::new(store);

        assert!(matches!(
            directory.resolve("missing").await,
            Err(CoreError::TopicNotFound { .. })
        ));
        assert!(matches!(
            directory.publish("missing", "k", b"v").await,
            Err(CoreError::TopicNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn publish_appends_decodable_entries() {
        let store = Arc::new(InMemoryLogStore::new());
        let directory = TopicDirectory::new(Arc::clone(&store) as Arc<dyn LogStore>);

        let log = directory.create_topic("events").await.unwrap();
        let p1 = directory.publish("events", "a", b"A_1").await.unwrap();
        let p2 = directory.publish_unkeyed("events", b"beat").await.unwrap();

        assert_eq!(p1, Position::new(log, EntryId::new(0)));
        assert_eq!(p2, Position::new(log, EntryId::new(1)));

        let entries = store
            .read(log, EntryId::new(0), EntryId::new(1))
            .await
            .unwrap();
        let first = keyfold_codec::decode(&entries[0].1).unwrap();
        assert_eq!(first.key.as_deref(), Some("a"));
        assert_eq!(first.payload, b"A_1");

        let second = keyfold_codec::decode(&entries[1].1).unwrap();
        assert_eq!(second.key, None);
        assert_eq!(second.payload, b"beat");
    }
}
