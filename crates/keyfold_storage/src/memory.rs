//! In-memory log store for testing and ephemeral embedding.

use crate::error::{StorageError, StorageResult};
use crate::store::LogStore;
use crate::types::{EntryId, LogId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
struct MemoryLog {
    entries: Vec<Vec<u8>>,
    sealed: bool,
}

/// An in-memory log store.
///
/// This store keeps all logs in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral topics that don't need persistence
///
/// # Thread Safety
///
/// This store is thread-safe and can be shared across tasks behind an
/// `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use keyfold_storage::{InMemoryLogStore, LogStore};
///
/// let store = InMemoryLogStore::new();
/// let log = store.create_log().await?;
/// let entry = store.append(log, b"hello").await?;
/// assert_eq!(entry.as_u64(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLogStore {
    logs: RwLock<HashMap<u64, MemoryLog>>,
    next_log_id: AtomicU64,
}

impl InMemoryLogStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of logs currently held by the store.
    ///
    /// Useful for asserting that failed compaction runs leave no logs
    /// behind.
    #[must_use]
    pub fn log_count(&self) -> usize {
        self.logs.read().len()
    }

    /// Returns whether the given log exists in the store.
    #[must_use]
    pub fn contains(&self, log_id: LogId) -> bool {
        self.logs.read().contains_key(&log_id.as_u64())
    }

    /// Returns whether the given log has been sealed.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist.
    pub fn is_sealed(&self, log_id: LogId) -> StorageResult<bool> {
        let logs = self.logs.read();
        let log = logs
            .get(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;
        Ok(log.sealed)
    }
}

#[async_trait]
impl LogStore for InMemoryLogStore {
    async fn create_log(&self) -> StorageResult<LogId> {
        let id = self.next_log_id.fetch_add(1, Ordering::SeqCst);
        self.logs.write().insert(id, MemoryLog::default());
        Ok(LogId::new(id))
    }

    async fn append(&self, log_id: LogId, entry: &[u8]) -> StorageResult<EntryId> {
        let mut logs = self.logs.write();
        let log = logs
            .get_mut(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        if log.sealed {
            return Err(StorageError::LogSealed { log_id });
        }

        log.entries.push(entry.to_vec());
        Ok(EntryId::new(log.entries.len() as u64 - 1))
    }

    async fn seal(&self, log_id: LogId) -> StorageResult<()> {
        let mut logs = self.logs.write();
        let log = logs
            .get_mut(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        if log.sealed {
            return Err(StorageError::LogSealed { log_id });
        }

        log.sealed = true;
        Ok(())
    }

    async fn last_confirmed(&self, log_id: LogId) -> StorageResult<Option<EntryId>> {
        let logs = self.logs.read();
        let log = logs
            .get(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        Ok(match log.entries.len() {
            0 => None,
            n => Some(EntryId::new(n as u64 - 1)),
        })
    }

    async fn read(
        &self,
        log_id: LogId,
        from: EntryId,
        to: EntryId,
    ) -> StorageResult<Vec<(EntryId, Vec<u8>)>> {
        let logs = self.logs.read();
        let log = logs
            .get(&log_id.as_u64())
            .ok_or(StorageError::LogNotFound { log_id })?;

        let len = log.entries.len() as u64;
        if len == 0 || from > to || from.as_u64() >= len {
            return Ok(Vec::new());
        }

        let end = to.as_u64().min(len - 1);
        let mut out = Vec::with_capacity((end - from.as_u64() + 1) as usize);
        for id in from.as_u64()..=end {
            out.push((EntryId::new(id), log.entries[id as usize].clone()));
        }
        Ok(out)
    }

    async fn remove_log(&self, log_id: LogId) -> StorageResult<()> {
        let mut logs = self.logs.write();
        logs.remove(&log_id.as_u64())
            .map(|_| ())
            .ok_or(StorageError::LogNotFound { log_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_monotonic_ids() {
        let store = InMemoryLogStore::new();
        let a = store.create_log().await.unwrap();
        let b = store.create_log().await.unwrap();
        assert!(a < b);
        assert_eq!(store.log_count(), 2);
    }

    #[tokio::test]
    async fn append_assigns_dense_entry_ids() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();

        assert_eq!(store.append(log, b"a").await.unwrap(), EntryId::new(0));
        assert_eq!(store.append(log, b"b").await.unwrap(), EntryId::new(1));
        assert_eq!(store.append(log, b"c").await.unwrap(), EntryId::new(2));
    }

    #[tokio::test]
    async fn last_confirmed_tracks_appends() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();

        assert_eq!(store.last_confirmed(log).await.unwrap(), None);

        store.append(log, b"a").await.unwrap();
        store.append(log, b"b").await.unwrap();
        assert_eq!(
            store.last_confirmed(log).await.unwrap(),
            Some(EntryId::new(1))
        );
    }

    #[tokio::test]
    async fn read_returns_range_in_order() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        for b in [b"a", b"b", b"c"] {
            store.append(log, b).await.unwrap();
        }

        let entries = store
            .read(log, EntryId::new(0), EntryId::new(2))
            .await
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (EntryId::new(0), b"a".to_vec()));
        assert_eq!(entries[2], (EntryId::new(2), b"c".to_vec()));
    }

    #[tokio::test]
    async fn read_clamps_to_tail() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.append(log, b"only").await.unwrap();

        let entries = store
            .read(log, EntryId::new(0), EntryId::new(100))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn read_empty_range_yields_nothing() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.append(log, b"x").await.unwrap();

        let entries = store
            .read(log, EntryId::new(5), EntryId::new(9))
            .await
            .unwrap();
        assert!(entries.is_empty());

        let entries = store
            .read(log, EntryId::new(1), EntryId::new(0))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn sealed_log_rejects_appends() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.append(log, b"a").await.unwrap();
        store.seal(log).await.unwrap();

        let result = store.append(log, b"b").await;
        assert!(matches!(result, Err(StorageError::LogSealed { .. })));
    }

    #[tokio::test]
    async fn seal_is_one_time() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.seal(log).await.unwrap();

        let result = store.seal(log).await;
        assert!(matches!(result, Err(StorageError::LogSealed { .. })));
    }

    #[tokio::test]
    async fn sealed_log_remains_readable() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.append(log, b"kept").await.unwrap();
        store.seal(log).await.unwrap();

        assert_eq!(
            store.last_confirmed(log).await.unwrap(),
            Some(EntryId::new(0))
        );
        let entries = store
            .read(log, EntryId::new(0), EntryId::new(0))
            .await
            .unwrap();
        assert_eq!(entries[0].1, b"kept");
    }

    #[tokio::test]
    async fn remove_log_deletes_it() {
        let store = InMemoryLogStore::new();
        let log = store.create_log().await.unwrap();
        store.remove_log(log).await.unwrap();

        assert!(!store.contains(log));
        let result = store.last_confirmed(log).await;
        assert!(matches!(result, Err(StorageError::LogNotFound { .. })));
    }

    #[tokio::test]
    async fn unknown_log_fails() {
        let store = InMemoryLogStore::new();
        let missing = LogId::new(42);

        assert!(matches!(
            store.append(missing, b"x").await,
            Err(StorageError::LogNotFound { .. })
        ));
        assert!(matches!(
            store.seal(missing).await,
            Err(StorageError::LogNotFound { .. })
        ));
        assert!(matches!(
            store.read(missing, EntryId::new(0), EntryId::new(0)).await,
            Err(StorageError::LogNotFound { .. })
        ));
    }
}
