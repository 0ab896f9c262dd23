//! Raw log entries as read by the compactor.

use keyfold_codec::DecodedEntry;
use keyfold_storage::Position;

/// One physical record read from a log.
///
/// A `RawEntry` is immutable once read. Entries without a key decode
/// successfully but are excluded from compaction indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Where the entry sits in its log.
    pub position: Position,
    /// The metadata block exactly as stored.
    pub metadata: Vec<u8>,
    /// The key carried in the metadata block, if any.
    pub key: Option<String>,
    /// The entry payload.
    pub payload: Vec<u8>,
}

impl RawEntry {
    /// Builds a raw entry from a decoded envelope and its position.
    #[must_use]
    pub fn from_decoded(position: Position, decoded: DecodedEntry) -> Self {
        Self {
            position,
            metadata: decoded.metadata,
            key: decoded.key,
            payload: decoded.payload,
        }
    }

    /// Returns whether the entry carries a key.
    #[must_use]
    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }
}
