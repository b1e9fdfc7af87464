//! # Shared Types Crate
//!
//! Types shared between the verification engine (`vf-01`) and the update
//! channel (`vf-02`).
//!
//! ## Design Principles
//!
//! - **One rule grammar**: both the topology loader and the controller
//!   protocol parse rules through [`Rule::from_str`](std::str::FromStr).
//! - **Normalised prefixes**: every prefix is truncated to its network
//!   address on parse, so `10.0.0.7/24` and `10.0.0.0/24` are the same key.
//! - **Validated identifiers**: a [`NodeId`] can never contain one of the
//!   grammar's delimiters.

pub mod entities;
pub mod errors;
pub mod prefix;

pub use entities::*;
pub use errors::*;
pub use prefix::*;

pub use ipnet::Ipv4Net;
