//! Adapters Layer
//!
//! Concrete implementations of the driven ports.

pub mod topology_file;

pub use topology_file::{load_topology, FileTopologySource};
