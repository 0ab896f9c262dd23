//! Log store trait definition.

use crate::error::StorageResult;
use crate::types::{EntryId, LogId};
use async_trait::async_trait;

/// A store of append-only log segments.
///
/// Log stores are **opaque byte stores**. Each log is an ordered sequence of
/// binary entries addressed by dense [`EntryId`]s; the store never interprets
/// entry contents. Keyfold owns all entry format interpretation - stores do
/// not understand envelopes, keys, or payloads.
///
/// # Invariants
///
/// - `append` assigns dense entry IDs starting at `0`
/// - `read` yields exactly the bytes previously appended, in ascending
///   entry order, with no gaps or reordering
/// - `seal` is a one-time, irreversible transition; a sealed log rejects
///   further appends and its `last_confirmed` is stable
/// - Entries below `last_confirmed` are immutable once written
/// - Stores must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryLogStore`] - For testing and ephemeral embedding
/// - [`super::FileLogStore`] - For persistent storage
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Creates a new, empty, writable log and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot allocate the log.
    async fn create_log(&self) -> StorageResult<LogId>;

    /// Appends one entry to the log and returns its assigned entry ID.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The log does not exist (`LogNotFound`)
    /// - The log has been sealed (`LogSealed`)
    /// - An I/O error occurs
    async fn append(&self, log_id: LogId, entry: &[u8]) -> StorageResult<EntryId>;

    /// Seals the log, making it immutable.
    ///
    /// After sealing, `last_confirmed(log_id)` is stable and
    /// `last_confirmed + 1` equals the number of appended entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist or is already sealed.
    async fn seal(&self, log_id: LogId) -> StorageResult<()>;

    /// Returns the highest durable entry ID, or `None` for an empty log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist.
    async fn last_confirmed(&self, log_id: LogId) -> StorageResult<Option<EntryId>>;

    /// Reads entries in the inclusive range `from..=to`.
    ///
    /// The range is clamped to the durable tail of the log: a range starting
    /// beyond `last_confirmed` (or an inverted range) yields an empty vector,
    /// not an error. Entries are returned in ascending ID order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist or an I/O error occurs.
    async fn read(
        &self,
        log_id: LogId,
        from: EntryId,
        to: EntryId,
    ) -> StorageResult<Vec<(EntryId, Vec<u8>)>>;

    /// Deletes a log and its backing storage.
    ///
    /// Used to discard abandoned output logs. Removing a sealed log is
    /// permitted; retention of compacted outputs is a caller decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the log does not exist or deletion fails.
    async fn remove_log(&self, log_id: LogId) -> StorageResult<()>;
}
