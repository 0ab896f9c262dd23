//! # Keyfold Testkit
//!
//! Test utilities for Keyfold.
//!
//! This crate provides:
//! - Topic fixtures over both store implementations
//! - Property-based test generators using proptest
//! - Cross-language wire vectors for the entry envelope
//! - Cross-crate integration harnesses
//!
//! ## Usage
//!
//! ```rust,ignore
//! use keyfold_testkit::prelude::*;
//!
//! #[tokio::test]
//! async fn latest_value_wins() {
//!     let topic = TestTopic::memory("t").await;
//!     topic.publish("a", b"old").await;
//!     topic.publish("a", b"new").await;
//!
//!     let output = topic.compact().await.unwrap();
//!     let entries = topic.compacted_entries(output).await;
//!     assert_eq!(entries, vec![("a".to_string(), b"new".to_vec())]);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod vectors;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::vectors::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use vectors::*;
