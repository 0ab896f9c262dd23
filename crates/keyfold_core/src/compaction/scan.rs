//! Phase one: scan the source log and build the compaction index.

use crate::compaction::index::CompactionIndex;
use crate::error::CoreResult;
use crate::reader::LogReader;
use keyfold_storage::{EntryId, LogId, LogStore};
use std::sync::Arc;
use tracing::debug;

/// Scans the source log from its first entry through the snapshot
/// boundary (inclusive), observing every keyed entry into a fresh index.
///
/// Keyless entries are read and skipped. The boundary is captured once by
/// the orchestrator before the scan starts, so entries appended
/// concurrently past it are simply not observed by this run.
pub(crate) async fn scan_to_boundary(
    store: &Arc<dyn LogStore>,
    source: LogId,
    boundary: EntryId,
    batch_size: usize,
) -> CoreResult<CompactionIndex> {
    let mut reader = LogReader::open(Arc::clone(store), source, batch_size);
    reader.read_range(EntryId::new(0), boundary);

    let mut index = CompactionIndex::new();
    let mut scanned = 0u64;
    let mut keyless = 0u64;

    while let Some(entry) = reader.next().await? {
        scanned += 1;
        match entry.key {
            Some(key) => index.observe(key, entry.position),
            None => keyless += 1,
        }
    }

    debug!(
        log = %source,
        scanned,
        keyless,
        keys = index.len(),
        "phase one scan complete"
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyfold_storage::InMemoryLogStore;

    async fn seeded(entries: &[(Option<&str>, &[u8])]) -> (Arc<dyn LogStore>, LogId, EntryId) {
        let store = Arc::new(InMemoryLogStore::new());
        let log = store.create_log().await.unwrap();
        for (key, payload) in entries {
            store
                .append(log, &keyfold_codec::encode(*key, payload))
                .await
                .unwrap();
        }
        let boundary = store.last_confirmed(log).await.unwrap().unwrap();
        (store as Arc<dyn LogStore>, log, boundary)
    }

    #[tokio::test]
    async fn indexes_last_occurrence_per_key() {
        let (store, log, boundary) = seeded(&[
            (Some("a"), b"A_1"),
            (Some("b"), b"B_1"),
            (Some("a"), b"A_2"),
        ])
        .await;

        let index = scan_to_boundary(&store, log, boundary, 10).await.unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("a").unwrap().entry_id, EntryId::new(2));
        assert_eq!(index.get("b").unwrap().entry_id, EntryId::new(1));
    }

    #[tokio::test]
    async fn keyless_entries_are_skipped() {
        let (store, log, boundary) = seeded(&[
            (None, b"beat"),
            (Some("a"), b"A_1"),
            (None, b"beat"),
        ])
        .await;

        let index = scan_to_boundary(&store, log, boundary, 10).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().entry_id, EntryId::new(1));
    }

    #[tokio::test]
    async fn scan_stops_at_boundary() {
        let (store, log, _) = seeded(&[(Some("a"), b"A_1"), (Some("a"), b"A_2")]).await;

        // Boundary below the tail: the later occurrence is invisible.
        let index = scan_to_boundary(&store, log, EntryId::new(0), 10)
            .await
            .unwrap();
        assert_eq!(index.get("a").unwrap().entry_id, EntryId::new(0));
    }
}
