//! Domain Layer - Pure verification logic
//!
//! This layer contains:
//! - Address trie of equivalence classes
//! - Forwarding model (switches, hosts, rule tables)
//! - Network state coupling both under prefix reference counts
//! - Verification engine (loop and black-hole detection)
//! - Topology description parsing
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod engine;
pub mod forwarding;
pub mod network;
pub mod topology;
pub mod trie;

pub use engine::{
    ErrorKind, ForwardingGraph, NetworkError, VerificationEngine, VerificationOutcome,
    VerificationScope,
};
pub use forwarding::{ForwardingModel, Host, Switch};
pub use network::NetworkState;
pub use topology::{parse_topology, HostEntry, RuleEntry, SwitchEntry, TopologyDescription};
pub use trie::{AddressTrie, AffectedEcs, EquivalenceClass};
