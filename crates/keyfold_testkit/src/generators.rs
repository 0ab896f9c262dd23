//! Property-based test generators using proptest.
//!
//! Strategies deliberately draw keys from a small pool so that generated
//! append sequences are collision-rich - the interesting case for
//! last-value-wins compaction.

use proptest::prelude::*;

/// Strategy for generating topic keys from a small pool.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
    ])
    .prop_map(str::to_string)
}

/// Strategy for generating entry payloads.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..128)
}

/// Strategy for generating a sequence of keyed appends.
pub fn append_sequence_strategy(
    min_appends: usize,
    max_appends: usize,
) -> impl Strategy<Value = Vec<(String, Vec<u8>)>> {
    prop::collection::vec((key_strategy(), payload_strategy()), min_appends..max_appends)
}
