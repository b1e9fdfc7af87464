//! # Error Types
//!
//! Parse errors for identifiers, prefixes and rules.

use thiserror::Error;

/// Errors raised while parsing a rule or one of its fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    /// A required field was absent or empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// More `-` separated fields than the grammar allows.
    #[error("Unexpected trailing field: {0}")]
    TrailingField(String),

    /// Identifier contains a reserved character or whitespace.
    #[error("Invalid node id: {0:?}")]
    InvalidNodeId(String),

    /// Prefix error.
    #[error(transparent)]
    Prefix(#[from] PrefixError),
}

/// Errors raised while parsing an IPv4 prefix in `a.b.c.d/len` form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    /// The `/maskLen` part is absent.
    #[error("Prefix {0:?} has no mask length")]
    MissingMask(String),

    /// The address part is not a dotted-quad IPv4 address.
    #[error("Invalid network address: {0:?}")]
    InvalidAddress(String),

    /// The mask length is not a number in `0..=32`.
    #[error("Invalid mask length: {0:?} (must be 0..=32)")]
    InvalidMaskLength(String),
}
