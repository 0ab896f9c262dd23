//! Entry envelope encoding and decoding.
//!
//! Wire format (bit-compatible for any reader of the log):
//!
//! ```text
//! [crc32 (4, LE)] [metadata length (4, LE)] [metadata block] [payload]
//! ```
//!
//! The checksum covers every byte after the checksum field. It is verified
//! before any other field is trusted. Encoding is byte-for-byte
//! reproducible for identical inputs.

use crate::crc::compute_crc32;
use crate::error::{CodecError, CodecResult};
use crate::metadata::EntryMetadata;

/// Size of the checksum field.
const CHECKSUM_SIZE: usize = 4;

/// Size of the metadata length field.
const METADATA_LEN_SIZE: usize = 4;

/// A decoded entry: its byte-exact metadata block, the key extracted from
/// it (if any), and the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntry {
    /// The metadata block exactly as stored.
    pub metadata: Vec<u8>,
    /// The key carried in the metadata block, if any.
    pub key: Option<String>,
    /// The entry payload.
    pub payload: Vec<u8>,
}

/// Encodes an entry envelope from a key and payload.
#[must_use]
pub fn encode(key: Option<&str>, payload: &[u8]) -> Vec<u8> {
    let metadata = EntryMetadata {
        key: key.map(str::to_string),
    }
    .encode();

    let mut body = Vec::with_capacity(METADATA_LEN_SIZE + metadata.len() + payload.len());
    body.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
    body.extend_from_slice(&metadata);
    body.extend_from_slice(payload);

    let crc = compute_crc32(&body);
    let mut out = Vec::with_capacity(CHECKSUM_SIZE + body.len());
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

/// Returns the encoded envelope size for the given key and payload length.
#[must_use]
pub fn encoded_len(key: Option<&str>, payload_len: usize) -> usize {
    let metadata_len = EntryMetadata {
        key: key.map(str::to_string),
    }
    .encoded_len();
    CHECKSUM_SIZE + METADATA_LEN_SIZE + metadata_len + payload_len
}

/// Decodes an entry envelope.
///
/// The checksum is verified over the remainder of the entry before any
/// field is trusted; the length-prefixed metadata block is read next, and
/// all remaining bytes are the payload.
///
/// # Errors
///
/// Returns an error if:
/// - The input is shorter than the envelope header (`UnexpectedEof`)
/// - The stored checksum does not match (`ChecksumMismatch`)
/// - The metadata block is truncated or malformed
pub fn decode(bytes: &[u8]) -> CodecResult<DecodedEntry> {
    if bytes.len() < CHECKSUM_SIZE + METADATA_LEN_SIZE {
        return Err(CodecError::UnexpectedEof);
    }

    let expected = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let actual = compute_crc32(&bytes[CHECKSUM_SIZE..]);
    if expected != actual {
        return Err(CodecError::ChecksumMismatch { expected, actual });
    }

    let metadata_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let metadata_start = CHECKSUM_SIZE + METADATA_LEN_SIZE;
    let metadata_end = metadata_start
        .checked_add(metadata_len)
        .ok_or(CodecError::UnexpectedEof)?;
    if bytes.len() < metadata_end {
        return Err(CodecError::UnexpectedEof);
    }

    let metadata = bytes[metadata_start..metadata_end].to_vec();
    let key = EntryMetadata::decode(&metadata)?.key;
    let payload = bytes[metadata_end..].to_vec();

    Ok(DecodedEntry {
        metadata,
        key,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_roundtrip() {
        let encoded = encode(Some("a"), b"A_1");
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.key.as_deref(), Some("a"));
        assert_eq!(decoded.payload, b"A_1");
        assert_eq!(encoded.len(), encoded_len(Some("a"), 3));
    }

    #[test]
    fn unkeyed_roundtrip() {
        let encoded = encode(None, b"no key here");
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.key, None);
        assert_eq!(decoded.payload, b"no key here");
    }

    #[test]
    fn empty_payload_roundtrip() {
        let encoded = encode(Some("k"), b"");
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.key.as_deref(), Some("k"));
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(encode(Some("key"), b"payload"), encode(Some("key"), b"payload"));
    }

    #[test]
    fn metadata_block_is_byte_exact() {
        let encoded = encode(Some("k"), b"v");
        let decoded = decode(&encoded).unwrap();

        assert_eq!(decoded.metadata, EntryMetadata::keyed("k").encode());
    }

    #[test]
    fn corruption_is_detected() {
        let mut encoded = encode(Some("key"), b"payload");
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let result = decode(&encoded);
        assert!(matches!(result, Err(CodecError::ChecksumMismatch { .. })));
    }

    #[test]
    fn corrupt_metadata_length_is_detected() {
        let mut encoded = encode(Some("key"), b"payload");
        encoded[4] ^= 0xFF;

        // The checksum covers the length field, so the flip is caught
        // before the bogus length is trusted.
        let result = decode(&encoded);
        assert!(matches!(result, Err(CodecError::ChecksumMismatch { .. })));
    }

    #[test]
    fn truncated_input_is_rejected() {
        let encoded = encode(Some("key"), b"payload");

        for len in 0..CHECKSUM_SIZE + METADATA_LEN_SIZE {
            assert_eq!(decode(&encoded[..len]), Err(CodecError::UnexpectedEof));
        }
    }

    #[test]
    fn arbitrary_input_never_panics() {
        let inputs: [&[u8]; 5] = [
            &[],
            &[0x00],
            &[0xFF; 7],
            &[0x00; 8],
            &[0xAB; 64],
        ];
        for input in inputs {
            let _ = decode(input);
        }
    }
}
