//! # VeriFlow Node Library
//!
//! Exposes the node's wiring for the binary and for end-to-end tests.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (JSON file, environment, command line)
//! 2. Initialize logging and metrics
//! 3. Bulk-load the topology through the per-rule add path
//! 4. Run one full verification and log the summary
//! 5. Start the mutation writer and the update channel
//! 6. Serve until shutdown

pub mod adapters;
pub mod config;
pub mod runtime;

pub use config::{ConfigError, NodeConfig};
pub use runtime::NodeRuntime;
