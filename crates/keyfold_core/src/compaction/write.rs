//! Phase two: materialize the frozen index into the output log.

use crate::compaction::index::FrozenIndex;
use crate::error::CoreResult;
use crate::reader::LogReader;
use keyfold_storage::{LogId, LogStore};
use std::sync::Arc;
use tracing::debug;

/// Re-reads each indexed position from the source log and appends its
/// payload, re-keyed, to the output log.
///
/// Pairs are written in ascending last-occurrence position order - the
/// frozen index's order - so the relative order of keys in the compacted
/// output reflects when each key was most recently touched. The caller
/// seals the output log afterwards.
pub(crate) async fn write_compacted(
    store: &Arc<dyn LogStore>,
    source: LogId,
    index: &FrozenIndex,
    output: LogId,
    batch_size: usize,
) -> CoreResult<u64> {
    let mut reader = LogReader::open(Arc::clone(store), source, batch_size);
    let mut written = 0u64;

    for (key, position) in index.entries() {
        let entry = reader.read_one(*position).await?;
        let bytes = keyfold_codec::encode(Some(key), &entry.payload);
        store.append(output, &bytes).await?;
        written += 1;
    }

    debug!(source = %source, output = %output, written, "phase two write complete");
    Ok(written)
}
