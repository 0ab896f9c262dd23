//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The stored checksum does not match the recomputed content.
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the entry.
        expected: u32,
        /// Checksum recomputed over the entry content.
        actual: u32,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The key is not valid UTF-8.
    #[error("key is not valid UTF-8")]
    InvalidKey,

    /// The metadata block is structurally invalid.
    #[error("invalid metadata block: {message}")]
    InvalidMetadata {
        /// Description of the structural error.
        message: String,
    },

    /// The metadata block uses an unknown format version.
    #[error("unsupported metadata version: {version}")]
    UnsupportedVersion {
        /// The version byte found in the block.
        version: u8,
    },
}

impl CodecError {
    /// Creates an invalid metadata error.
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }
}
