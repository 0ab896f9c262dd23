//! # Keyfold Core
//!
//! Two-phase keyed topic compaction engine.
//!
//! Keyfold compacts a keyed, append-only topic log into a smaller derived
//! log that retains exactly one entry per distinct key: the payload of
//! that key's most recent occurrence. Consumers get the latest value per
//! key without replaying the full history.
//!
//! This crate provides:
//! - [`LogReader`] - sequential, resumable reading of log entries
//! - [`CompactionIndex`] - the per-run last-position-per-key index
//! - [`TwoPhaseCompactor`] - the scan-then-write orchestrator
//! - [`CompactionScheduler`] - serialized background execution
//! - [`TopicClient`] / [`TopicDirectory`] - topic name resolution
//!
//! ## Example
//!
//! ```rust,ignore
//! use keyfold_core::{CompactionConfig, TopicDirectory, TwoPhaseCompactor};
//! use keyfold_storage::InMemoryLogStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryLogStore::new());
//! let topics = Arc::new(TopicDirectory::new(store.clone()));
//!
//! topics.create_topic("prices").await?;
//! topics.publish("prices", "acme", b"41.50").await?;
//! topics.publish("prices", "acme", b"42.10").await?;
//!
//! let compactor = TwoPhaseCompactor::new(store, topics, CompactionConfig::default());
//! let compacted = compactor.compact("prices").await?;
//! // `compacted` is a sealed log with one entry: ("acme", b"42.10")
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod compaction;
mod config;
mod entry;
mod error;
mod reader;
mod scheduler;
mod topic;

pub use compaction::{CompactionIndex, FrozenIndex, TwoPhaseCompactor};
pub use config::CompactionConfig;
pub use entry::RawEntry;
pub use error::{CoreError, CoreResult};
pub use reader::LogReader;
pub use scheduler::CompactionScheduler;
pub use topic::{TopicClient, TopicDirectory};

// Identifier types, re-exported for downstream convenience.
pub use keyfold_storage::{EntryId, LogId, Position};
