//! # Core Domain Entities
//!
//! - **Identity**: [`NodeId`] names a switch or a host.
//! - **Forwarding**: [`Rule`] is one `(switch, prefix, next hop)` flow entry.

use std::fmt;
use std::str::FromStr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::errors::RuleParseError;
use crate::prefix::parse_prefix;

/// Characters with a meaning in the rule grammar or topology file format.
const RESERVED: &[char] = &['-', '#', ':', ',', '/'];

/// Identifier of a switch or host.
///
/// Ids are opaque strings (`S1`, `H2`, or an address such as `192.168.0.1`)
/// and never contain whitespace or one of `- # : , /`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Validate and wrap an identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, RuleParseError> {
        let id = id.into();
        if id.is_empty() || id.chars().any(|c| c.is_whitespace() || RESERVED.contains(&c)) {
            return Err(RuleParseError::InvalidNodeId(id));
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = RuleParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A flow rule: traffic in `prefix` arriving at `switch_id` is forwarded
/// toward `next_hop` (a switch or a host).
///
/// Text form is `switchId-prefix/maskLen-nextHopId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    /// Switch holding the rule.
    pub switch_id: NodeId,
    /// Normalised destination prefix.
    pub prefix: Ipv4Net,
    /// Switch or host receiving matching traffic.
    pub next_hop: NodeId,
}

impl Rule {
    /// Create a rule; the prefix is normalised to its network address.
    pub fn new(switch_id: NodeId, prefix: Ipv4Net, next_hop: NodeId) -> Self {
        Self {
            switch_id,
            prefix: prefix.trunc(),
            next_hop,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.switch_id, self.prefix, self.next_hop)
    }
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.trim().split('-');

        let switch_id = next_field(&mut fields, "switchId")?;
        let prefix = next_field(&mut fields, "prefix/maskLen")?;
        let next_hop = next_field(&mut fields, "nextHopId")?;
        if let Some(extra) = fields.next() {
            return Err(RuleParseError::TrailingField(extra.to_string()));
        }

        Ok(Rule::new(
            NodeId::new(switch_id)?,
            parse_prefix(prefix)?,
            NodeId::new(next_hop)?,
        ))
    }
}

fn next_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<&'a str, RuleParseError> {
    match fields.next() {
        Some(f) if !f.is_empty() => Ok(f),
        _ => Err(RuleParseError::MissingField(name)),
    }
}
