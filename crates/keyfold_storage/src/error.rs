//! Error types for log store operations.

use crate::types::LogId;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during log store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested log does not exist in this store.
    #[error("log not found: {log_id}")]
    LogNotFound {
        /// The log that was requested.
        log_id: LogId,
    },

    /// Attempted to mutate a sealed log.
    #[error("log is sealed: {log_id}")]
    LogSealed {
        /// The log that is sealed.
        log_id: LogId,
    },

    /// Another process holds the store lock.
    #[error("store locked: another process has exclusive access")]
    StoreLocked,

    /// The on-disk representation of a log is corrupted.
    #[error("store corrupted: {0}")]
    Corrupted(String),
}
