//! Ports Layer
//!
//! - Driving Ports (inbound) - API used by the update channel and the node
//! - Driven Ports (outbound) - where topology descriptions come from

pub mod inbound;
pub mod outbound;

pub use inbound::{NetworkStatus, VerificationReport, VerifierApi};
pub use outbound::TopologySource;
