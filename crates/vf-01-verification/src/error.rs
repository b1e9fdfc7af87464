//! Error types for the verification subsystem

use shared_types::{NodeId, RuleParseError};
use thiserror::Error;

/// Errors raised while reading or building a topology description
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Topology file is empty")]
    Empty,

    #[error("Line {line}: missing section marker '{marker}' before end of file")]
    MissingSection { line: usize, marker: char },

    #[error("Line {line}: expected 'id:value', got '{text}'")]
    MalformedEntry { line: usize, text: String },

    #[error("Line {line}: invalid identifier: {source}")]
    InvalidId {
        line: usize,
        #[source]
        source: RuleParseError,
    },

    #[error("Line {line}: invalid rule: {source}")]
    InvalidRule {
        line: usize,
        #[source]
        source: RuleParseError,
    },

    #[error("Line {line}: {source}")]
    Rejected {
        line: usize,
        #[source]
        source: NetworkStateError,
    },

    #[error("Failed to read topology from {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Errors from mutating the forwarding model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkStateError {
    #[error("Unknown switch: {0}")]
    UnknownSwitch(NodeId),

    #[error("Unknown next hop: {0}")]
    UnknownNextHop(NodeId),

    #[error("Duplicate switch: {0}")]
    DuplicateSwitch(NodeId),

    #[error("Duplicate host: {0}")]
    DuplicateHost(NodeId),

    #[error("Host {host} attached to unknown switch {switch}")]
    HostOnUnknownSwitch { host: NodeId, switch: NodeId },
}

/// Errors from walking the forwarding graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// A walk ran longer than the number of switches allows; the
    /// visited-set bookkeeping is broken.
    #[error("Walk for {ec} from {start} exceeded {bound} hops")]
    WalkBoundExceeded {
        ec: String,
        start: NodeId,
        bound: usize,
    },
}

/// Top-level error returned by the verifier API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Network(#[from] NetworkStateError),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}
