//! Entry metadata block format.
//!
//! The metadata block sits between the envelope's length prefix and the
//! payload. Layout:
//!
//! ```text
//! version (1) | flags (1) | [key length (4, LE) | key bytes (UTF-8)]
//! ```
//!
//! The key fields are present only when flag bit 0 is set. Entries without
//! a key are valid; they decode to `key: None`.

use crate::error::{CodecError, CodecResult};

/// Current metadata block format version.
pub const METADATA_VERSION: u8 = 1;

/// Flag bit marking key presence.
const FLAG_HAS_KEY: u8 = 0x01;

/// Size of the fixed metadata header (version + flags).
const FIXED_HEADER: usize = 2;

/// Application-level metadata carried by an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntryMetadata {
    /// The entry's key, if any.
    pub key: Option<String>,
}

impl EntryMetadata {
    /// Creates metadata carrying a key.
    #[must_use]
    pub fn keyed(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
        }
    }

    /// Creates metadata without a key.
    #[must_use]
    pub fn unkeyed() -> Self {
        Self { key: None }
    }

    /// Returns the encoded size of this block.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        match &self.key {
            Some(key) => FIXED_HEADER + 4 + key.len(),
            None => FIXED_HEADER,
        }
    }

    /// Encodes the block to bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.push(METADATA_VERSION);

        match &self.key {
            Some(key) => {
                buf.push(FLAG_HAS_KEY);
                buf.extend_from_slice(&(key.len() as u32).to_le_bytes());
                buf.extend_from_slice(key.as_bytes());
            }
            None => buf.push(0),
        }
        buf
    }

    /// Decodes a block from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the block is truncated, carries an unknown
    /// version, has trailing bytes, or holds a non-UTF-8 key.
    pub fn decode(data: &[u8]) -> CodecResult<Self> {
        if data.len() < FIXED_HEADER {
            return Err(CodecError::UnexpectedEof);
        }

        let version = data[0];
        if version != METADATA_VERSION {
            return Err(CodecError::UnsupportedVersion { version });
        }

        let flags = data[1];
        if flags & FLAG_HAS_KEY == 0 {
            if data.len() != FIXED_HEADER {
                return Err(CodecError::invalid_metadata(
                    "trailing bytes after unkeyed block",
                ));
            }
            return Ok(Self { key: None });
        }

        if data.len() < FIXED_HEADER + 4 {
            return Err(CodecError::UnexpectedEof);
        }
        let key_len = u32::from_le_bytes([data[2], data[3], data[4], data[5]]) as usize;

        let key_start = FIXED_HEADER + 4;
        let key_end = key_start
            .checked_add(key_len)
            .ok_or(CodecError::UnexpectedEof)?;
        if data.len() < key_end {
            return Err(CodecError::UnexpectedEof);
        }
        if data.len() != key_end {
            return Err(CodecError::invalid_metadata("trailing bytes after key"));
        }

        let key = std::str::from_utf8(&data[key_start..key_end])
            .map_err(|_| CodecError::InvalidKey)?
            .to_string();

        Ok(Self { key: Some(key) })
    }
}
