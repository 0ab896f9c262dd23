//! Sequential, resumable reader over a log's entries.
//!
//! The reader pulls raw entries from the store in bounded batches and
//! decodes them one-by-one, keeping memory usage proportional to the batch
//! size regardless of log length. It performs no caching across opens:
//! re-opening a log for a second pass yields the same entries, because
//! logs are append-only and immutable below their confirmed tail.

use crate::entry::RawEntry;
use crate::error::{CoreError, CoreResult};
use keyfold_storage::{EntryId, LogId, LogStore, Position};
use std::collections::VecDeque;
use std::sync::Arc;

/// A sequential reader over one log's entries.
///
/// # Ordering
///
/// Entries are yielded strictly in ascending position order with no gaps,
/// skips, or reordering. Reading a range that starts beyond the log's
/// confirmed tail yields no entries, not an error.
///
/// # Design
///
/// - Fetches entries from the store in bounded batches
/// - Decodes each envelope as it is yielded
/// - Restartable from any explicit position via [`LogReader::read_range`]
pub struct LogReader {
    store: Arc<dyn LogStore>,
    log_id: LogId,
    batch_size: usize,
    /// Fetched-but-not-yet-yielded raw entries.
    buffer: VecDeque<(EntryId, Vec<u8>)>,
    /// Next entry to fetch from the store.
    next_id: EntryId,
    /// Inclusive end of the active range; `None` when exhausted.
    end: Option<EntryId>,
}

impl LogReader {
    /// Opens a reader over the given log.
    ///
    /// The reader starts with no active range; call
    /// [`LogReader::read_range`] to position it.
    #[must_use]
    pub fn open(store: Arc<dyn LogStore>, log_id: LogId, batch_size: usize) -> Self {
        Self {
            store,
            log_id,
            batch_size: batch_size.max(1),
            buffer: VecDeque::new(),
            next_id: EntryId::new(0),
            end: None,
        }
    }

    /// Returns the log this reader is bound to.
    #[must_use]
    pub fn log_id(&self) -> LogId {
        self.log_id
    }

    /// Positions the reader over the inclusive range `from..=to`.
    ///
    /// Any previously buffered entries are discarded; the reader can be
    /// repositioned at any time, including backwards.
    pub fn read_range(&mut self, from: EntryId, to: EntryId) {
        self.buffer.clear();
        self.next_id = from;
        self.end = if from <= to { Some(to) } else { None };
    }

    /// Yields the next entry of the active range, or `None` when the range
    /// is exhausted (or extends past the log's confirmed tail).
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or an entry fails to
    /// decode (a checksum mismatch is fatal to the surrounding run).
    pub async fn next(&mut self) -> CoreResult<Option<RawEntry>> {
        loop {
            if let Some((entry_id, bytes)) = self.buffer.pop_front() {
                let decoded = keyfold_codec::decode(&bytes)?;
                let position = Position::new(self.log_id, entry_id);
                return Ok(Some(RawEntry::from_decoded(position, decoded)));
            }

            let Some(end) = self.end else {
                return Ok(None);
            };
            if self.next_id > end {
                self.end = None;
                return Ok(None);
            }

            let batch_end =
                EntryId::new(end.as_u64().min(self.next_id.as_u64() + self.batch_size as u64 - 1));
            let entries = self.store.read(self.log_id, self.next_id, batch_end).await?;

            match entries.last() {
                Some((last_id, _)) => {
                    self.next_id = last_id.next();
                    self.buffer.extend(entries);
                }
                None => {
                    // Range starts beyond the durable tail.
                    self.end = None;
                    return Ok(None);
                }
            }
        }
    }

    /// Returns the log's highest durable entry ID, or `None` when empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist.
    pub async fn last_confirmed(&self) -> CoreResult<Option<EntryId>> {
        Ok(self.store.last_confirmed(self.log_id).await?)
    }

    /// Reads the single entry at the given position.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if the position does not resolve to an
    /// entry of this reader's log, or a decode/store error otherwise.
    pub async fn read_one(&mut self, position: Position) -> CoreResult<RawEntry> {
        if position.log_id != self.log_id {
            return Err(CoreError::EntryNotFound { position });
        }

        let entries = self
            .store
            .read(self.log_id, position.entry_id, position.entry_id)
            .await?;
        let (_, bytes) = entries
            .into_iter()
            .next()
            .ok_or(CoreError::EntryNotFound { position })?;

        let decoded = keyfold_codec::decode(&bytes)?;
        Ok(RawEntry::from_decoded(position, decoded))
    }
}
