//! # VF-01 Verification
//!
//! Real-time verification of SDN forwarding state. Rule changes are applied to
//! an address trie of equivalence classes (ECs) and only the ECs a change
//! touches are re-walked for forwarding loops and black holes.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `AddressTrie`: binary trie whose leaves are the ECs
//!   - `ForwardingModel`: switches, hosts, per-switch rule tables
//!   - `NetworkState`: applies rule changes to both under prefix refcounts
//!   - `VerificationEngine`: per-EC, per-host forwarding walks
//!   - `TopologyDescription`: start-up file format
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `VerifierApi`: Driving port (inbound API)
//!   - `TopologySource`: Driven port (where the topology comes from)
//!
//! - **Service Layer** (`service/`): `VerifierService`, one lock around
//!   mutate + re-verify
//!
//! - **Adapters Layer** (`adapters/`): `FileTopologySource`
//!
//! ## Invariants
//!
//! - The live ECs partition the 32-bit address space exactly.
//! - Validation happens before any mutation; a rejected rule changes nothing.
//! - A full pass replaces the error set; a scoped pass replaces only the
//!   entries of the ECs it covers.
//!
//! ## Usage Example
//!
//! ```ignore
//! use vf_01_verification::{load_topology, FileTopologySource, VerifierApi, VerifierService};
//!
//! let network = load_topology(&FileTopologySource::new("topology.txt"))?;
//! let service = VerifierService::new(network);
//! service.verify_all()?;
//!
//! let report = service.add_rule("S1-10.0.0.0/24-S2".parse()?)?;
//! if !report.well_formed {
//!     for violation in &report.new_errors {
//!         println!("{violation}");
//!     }
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

pub use adapters::{load_topology, FileTopologySource};
pub use domain::*;
pub use error::{NetworkStateError, TopologyError, VerificationError, VerifierError};
pub use metrics::{CountingMetrics, MetricsSnapshot, NoOpMetrics, VerifierMetrics};
pub use ports::{NetworkStatus, TopologySource, VerificationReport, VerifierApi};
pub use service::VerifierService;
