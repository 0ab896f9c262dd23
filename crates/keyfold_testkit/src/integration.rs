//! Cross-crate integration helpers and end-to-end checks.
//!
//! The harness tracks the expected latest value per key alongside the
//! real topic, so long scenarios can be verified in one call.

use crate::fixtures::TestTopic;
use keyfold_core::LogId;
use std::collections::HashMap;

/// A harness that mirrors every publish into an expected-state model.
pub struct CompactionHarness {
    /// The underlying test topic.
    pub topic: TestTopic,
    expected: HashMap<String, Vec<u8>>,
}

impl CompactionHarness {
    /// Creates a harness over an in-memory topic.
    pub async fn memory(name: &str) -> Self {
        Self {
            topic: TestTopic::memory(name).await,
            expected: HashMap::new(),
        }
    }

    /// Creates a harness over a file-backed topic.
    pub async fn file(name: &str) -> Self {
        Self {
            topic: TestTopic::file(name).await,
            expected: HashMap::new(),
        }
    }

    /// Publishes a keyed entry and tracks it as the key's expected value.
    pub async fn publish(&mut self, key: &str, payload: &[u8]) {
        self.topic.publish(key, payload).await;
        self.expected.insert(key.to_string(), payload.to_vec());
    }

    /// Compacts and verifies the output against the tracked model:
    /// one entry per tracked key, each holding the key's latest payload.
    ///
    /// Returns the output log id for further inspection.
    pub async fn compact_and_verify(&self) -> LogId {
        let output = self.topic.compact().await.expect("compaction failed");
        let entries = self.topic.compacted_entries(output).await;

        assert_eq!(
            entries.len(),
            self.expected.len(),
            "output should hold one entry per distinct key"
        );

        let mut remaining = self.expected.clone();
        for (key, payload) in entries {
            assert_eq!(
                remaining.remove(&key),
                Some(payload),
                "compacted value mismatch for key {key}"
            );
        }
        assert!(remaining.is_empty(), "missing keys in compacted output");

        output
    }

    /// Returns the number of tracked keys.
    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }
}
