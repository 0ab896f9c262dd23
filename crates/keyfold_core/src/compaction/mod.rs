//! Two-phase topic compaction.
//!
//! Compaction folds a keyed, append-only topic log down to a sealed
//! derived log holding exactly one entry per distinct key: the payload of
//! that key's most recent occurrence at or before the run's snapshot
//! boundary.
//!
//! ## Invariants
//!
//! - The snapshot boundary is captured once, before any other work
//! - Latest occurrence per key wins; keyless entries are skipped
//! - The scan phase fully completes before the write phase starts
//! - Output entries are ordered by ascending last-occurrence position
//! - The output log is sealed exactly once, on success only; a failed
//!   run's output is abandoned and removed

mod compactor;
mod index;
mod scan;
mod write;

pub use compactor::TwoPhaseCompactor;
pub use index::{CompactionIndex, FrozenIndex};
