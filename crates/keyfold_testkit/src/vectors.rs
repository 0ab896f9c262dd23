//! Cross-language wire vectors for the entry envelope.
//!
//! These vectors pin the envelope's byte layout so that any reader of a
//! Keyfold log - in any language - stays bit-compatible.

use serde::{Deserialize, Serialize};

/// A wire vector that can be shared across languages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireVector {
    /// Unique identifier for this vector.
    pub id: String,
    /// Human-readable description.
    pub description: String,
    /// Entry key, if any.
    pub key: Option<String>,
    /// Entry payload (hex-encoded).
    pub payload_hex: String,
    /// Expected encoded envelope (hex-encoded).
    pub encoded_hex: String,
}

/// Envelope encoding vectors.
pub fn envelope_vectors() -> Vec<WireVector> {
    vec![
        WireVector {
            id: "keyed_short".into(),
            description: "single-byte key, short payload".into(),
            key: Some("a".into()),
            payload_hex: "415f31".into(),
            encoded_hex: "d49a5a1e0700000001010100000061415f31".into(),
        },
        WireVector {
            id: "unkeyed".into(),
            description: "keyless entry".into(),
            key: None,
            payload_hex: "62656174".into(),
            encoded_hex: "6eb29ed802000000010062656174".into(),
        },
        WireVector {
            id: "keyed_empty_payload".into(),
            description: "longer key, empty payload".into(),
            key: Some("sensor-7".into()),
            payload_hex: "".into(),
            encoded_hex: "4636d9e30e00000001010800000073656e736f722d37".into(),
        },
        WireVector {
            id: "empty_key".into(),
            description: "empty key is distinct from no key".into(),
            key: Some("".into()),
            payload_hex: "656d7074792d6b6579".into(),
            encoded_hex: "7991aa9106000000010100000000656d7074792d6b6579".into(),
        },
    ]
}

/// Serializes the vectors to JSON for consumption by other languages.
pub fn envelope_vectors_json() -> String {
    serde_json::to_string_pretty(&envelope_vectors()).expect("vectors are serializable")
}

/// Encodes bytes as a hexadecimal string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decodes a hexadecimal string to bytes.
///
/// # Panics
///
/// Panics on invalid hex; vectors are authored by hand and a typo should
/// fail loudly.
#[must_use]
pub fn hex_decode(hex: &str) -> Vec<u8> {
    let hex = hex.replace([' ', '\n', '\r'], "");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("invalid hex"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_matches_vectors() {
        for vector in envelope_vectors() {
            let payload = hex_decode(&vector.payload_hex);
            let encoded = keyfold_codec::encode(vector.key.as_deref(), &payload);
            assert_eq!(
                hex_encode(&encoded),
                vector.encoded_hex,
                "vector {} did not encode to its pinned bytes",
                vector.id
            );
        }
    }

    #[test]
    fn decoding_matches_vectors() {
        for vector in envelope_vectors() {
            let decoded = keyfold_codec::decode(&hex_decode(&vector.encoded_hex)).unwrap();
            assert_eq!(decoded.key, vector.key, "vector {}", vector.id);
            assert_eq!(
                hex_encode(&decoded.payload),
                vector.payload_hex,
                "vector {}",
                vector.id
            );
        }
    }

    #[test]
    fn vectors_serialize_to_json() {
        let json = envelope_vectors_json();
        let parsed: Vec<WireVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), envelope_vectors().len());
    }

    #[test]
    fn hex_helpers_roundtrip() {
        let bytes = vec![0x00, 0x7f, 0xff, 0x10];
        assert_eq!(hex_decode(&hex_encode(&bytes)), bytes);
    }
}
