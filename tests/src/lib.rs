//! # VeriFlow Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # Cross-crate scenarios
//! │   ├── scenarios.rs       # Loop, black hole, duplicate add
//! │   └── update_channel.rs  # Controller sessions over TCP
//! │
//! └── properties/       # Randomized invariants
//!     ├── partition.rs       # ECs tile the address space
//!     └── incremental.rs     # Scoped passes agree with a full pass
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vf-tests
//!
//! # By category
//! cargo test -p vf-tests integration::
//! cargo test -p vf-tests properties::
//!
//! # Benchmarks
//! cargo bench -p vf-tests
//! ```

pub mod fixtures;
pub mod integration;
pub mod properties;
