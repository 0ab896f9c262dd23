//! # Keyfold Storage
//!
//! Log store trait and implementations for Keyfold.
//!
//! This crate provides the lowest-level storage abstraction for Keyfold.
//! A log store holds append-only **log segments**: ordered sequences of
//! binary entries addressed by dense entry IDs. Stores are opaque byte
//! stores - they do not interpret the entries they hold.
//!
//! ## Design Principles
//!
//! - Logs are append-only; entries are immutable once written
//! - Sealing is a one-time transition from writable to immutable
//! - No knowledge of Keyfold entry envelopes, keys, or payloads
//! - Must be `Send + Sync` for concurrent access
//!
//! ## Available Stores
//!
//! - [`InMemoryLogStore`] - For testing and ephemeral topics
//! - [`FileLogStore`] - For persistent storage using OS file APIs

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod memory;
mod store;
mod types;

pub use error::{StorageError, StorageResult};
pub use file::FileLogStore;
pub use memory::InMemoryLogStore;
pub use store::LogStore;
pub use types::{EntryId, LogId, Position};
