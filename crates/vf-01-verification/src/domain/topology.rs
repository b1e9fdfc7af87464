//! # Topology Description
//!
//! Line-oriented start-up format:
//!
//! ```text
//! <header line, ignored>
//! S1:S2,S3          switch id and adjacency, until a line starting with `H`
//! H
//! H1:S1             host id and owning switch, until a line starting with `R`
//! R
//! S1-10.0.0.0/24-S2 initial rules, until EOF or a line starting with `E`
//! E
//! ```
//!
//! A section marker is a line that starts with the marker letter and is not
//! an entry of the current section (it contains no `:`, or no `-` for the
//! rule section). Blank lines are skipped. Errors carry 1-based line numbers.

use shared_types::{NodeId, Rule};
use tracing::{debug, warn};

use super::network::NetworkState;
use crate::error::TopologyError;

/// Switch line: id and topology neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchEntry {
    pub line: usize,
    pub id: NodeId,
    pub next_hops: Vec<NodeId>,
}

/// Host line: id and owning switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub line: usize,
    pub id: NodeId,
    pub switch_id: NodeId,
}

/// Rule line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub line: usize,
    pub rule: Rule,
}

/// Parsed topology file, not yet applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyDescription {
    pub switches: Vec<SwitchEntry>,
    pub hosts: Vec<HostEntry>,
    pub rules: Vec<RuleEntry>,
}

impl TopologyDescription {
    /// Apply the description to a fresh [`NetworkState`]: switches, then
    /// hosts, then every rule through [`NetworkState::add_rule`] in file
    /// order.
    pub fn build(&self) -> Result<NetworkState, TopologyError> {
        let mut network = NetworkState::new();

        for entry in &self.switches {
            network
                .add_switch(entry.id.clone(), entry.next_hops.clone())
                .map_err(|source| TopologyError::Rejected {
                    line: entry.line,
                    source,
                })?;
        }
        for entry in &self.switches {
            for hop in &entry.next_hops {
                if network.model().switch(hop).is_none() {
                    warn!(
                        line = entry.line,
                        switch = %entry.id,
                        neighbour = %hop,
                        "[vf-01] Adjacency lists unknown switch"
                    );
                }
            }
        }

        for entry in &self.hosts {
            network
                .add_host(entry.id.clone(), entry.switch_id.clone())
                .map_err(|source| TopologyError::Rejected {
                    line: entry.line,
                    source,
                })?;
        }

        for entry in &self.rules {
            let affected = network
                .add_rule(entry.rule.clone())
                .map_err(|source| TopologyError::Rejected {
                    line: entry.line,
                    source,
                })?;
            debug!(rule = %entry.rule, affected = affected.len(), "[vf-01] Loaded rule");
        }

        Ok(network)
    }
}

/// Parse the text of a topology file.
pub fn parse_topology(text: &str) -> Result<TopologyDescription, TopologyError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()));

    if lines.next().is_none() {
        return Err(TopologyError::Empty);
    }

    let mut description = TopologyDescription::default();
    let mut last_line = 1;

    // Switches until `H`.
    let mut closed = false;
    for (line, text) in lines.by_ref() {
        last_line = line;
        if text.is_empty() {
            continue;
        }
        if is_marker(text, 'H', ':') {
            closed = true;
            break;
        }
        let (id, hops) = split_entry(line, text)?;
        let next_hops = hops
            .split(',')
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .map(|hop| node_id(line, hop))
            .collect::<Result<Vec<_>, _>>()?;
        description.switches.push(SwitchEntry {
            line,
            id: node_id(line, id)?,
            next_hops,
        });
    }
    if !closed {
        return Err(TopologyError::MissingSection {
            line: last_line,
            marker: 'H',
        });
    }

    // Hosts until `R`.
    closed = false;
    for (line, text) in lines.by_ref() {
        last_line = line;
        if text.is_empty() {
            continue;
        }
        if is_marker(text, 'R', ':') {
            closed = true;
            break;
        }
        let (id, switch_id) = split_entry(line, text)?;
        description.hosts.push(HostEntry {
            line,
            id: node_id(line, id)?,
            switch_id: node_id(line, switch_id.trim())?,
        });
    }
    if !closed {
        return Err(TopologyError::MissingSection {
            line: last_line,
            marker: 'R',
        });
    }

    // Rules until `E` or EOF.
    for (line, text) in lines {
        if text.is_empty() {
            continue;
        }
        if is_marker(text, 'E', '-') {
            break;
        }
        let rule = text
            .parse::<Rule>()
            .map_err(|source| TopologyError::InvalidRule { line, source })?;
        description.rules.push(RuleEntry { line, rule });
    }

    Ok(description)
}

fn is_marker(text: &str, marker: char, separator: char) -> bool {
    text.starts_with(marker) && !text.contains(separator)
}

fn split_entry(line: usize, text: &str) -> Result<(&str, &str), TopologyError> {
    text.split_once(':')
        .map(|(id, rest)| (id.trim(), rest))
        .ok_or_else(|| TopologyError::MalformedEntry {
            line,
            text: text.to_string(),
        })
}

fn node_id(line: usize, raw: &str) -> Result<NodeId, TopologyError> {
    NodeId::new(raw).map_err(|source| TopologyError::InvalidId { line, source })
}
