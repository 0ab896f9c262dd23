//! Error types for Keyfold core.

use keyfold_storage::Position;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in Keyfold core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Log store error.
    #[error("storage error: {0}")]
    Storage(#[from] keyfold_storage::StorageError),

    /// Entry envelope codec error.
    #[error("codec error: {0}")]
    Codec(#[from] keyfold_codec::CodecError),

    /// The topic has no entries to compact.
    #[error("cannot compact empty topic: {topic}")]
    EmptyTopic {
        /// Name of the topic.
        topic: String,
    },

    /// The topic name does not resolve to a log.
    #[error("topic not found: {topic}")]
    TopicNotFound {
        /// Name of the topic.
        topic: String,
    },

    /// A topic with this name already exists.
    #[error("topic already exists: {topic}")]
    TopicExists {
        /// Name of the topic.
        topic: String,
    },

    /// An indexed position no longer resolves to an entry.
    #[error("entry not found at position {position}")]
    EntryNotFound {
        /// The position that failed to resolve.
        position: Position,
    },

    /// The compaction job queue is full.
    #[error("compaction queue is full")]
    SchedulerBusy,

    /// The compaction worker has stopped.
    #[error("compaction worker has stopped")]
    SchedulerStopped,
}

impl CoreError {
    /// Creates an empty topic error.
    pub fn empty_topic(topic: impl Into<String>) -> Self {
        Self::EmptyTopic {
            topic: topic.into(),
        }
    }

    /// Creates a topic not found error.
    pub fn topic_not_found(topic: impl Into<String>) -> Self {
        Self::TopicNotFound {
            topic: topic.into(),
        }
    }

    /// Creates a topic already exists error.
    pub fn topic_exists(topic: impl Into<String>) -> Self {
        Self::TopicExists {
            topic: topic.into(),
        }
    }
}
