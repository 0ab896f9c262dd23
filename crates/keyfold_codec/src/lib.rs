//! # Keyfold Codec
//!
//! Entry envelope codec for Keyfold logs.
//!
//! Every entry in a Keyfold log is wrapped in a checksummed binary
//! envelope:
//!
//! ```text
//! [crc32 (4, LE)] [metadata length (4, LE)] [metadata block] [payload]
//! ```
//!
//! The metadata block carries the application-level key, when present.
//! This crate is pure functions over bytes: no I/O, no positions, no
//! knowledge of logs.
//!
//! ## Example
//!
//! ```rust
//! use keyfold_codec::{decode, encode};
//!
//! let bytes = encode(Some("sensor-7"), b"21.5C");
//! let entry = decode(&bytes).unwrap();
//! assert_eq!(entry.key.as_deref(), Some("sensor-7"));
//! assert_eq!(entry.payload, b"21.5C");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod crc;
mod envelope;
mod error;
mod metadata;

pub use crc::compute_crc32;
pub use envelope::{decode, encode, encoded_len, DecodedEntry};
pub use error::{CodecError, CodecResult};
pub use metadata::{EntryMetadata, METADATA_VERSION};
