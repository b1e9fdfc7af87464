//! Randomized invariants, checked with `proptest`.

pub mod incremental;
pub mod partition;
