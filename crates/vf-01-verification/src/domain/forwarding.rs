//! # Forwarding Model
//!
//! Switches with their adjacency, rule tables and attached hosts.
//!
//! The model only stores and looks up state. Keeping the address trie in step
//! with the rule tables is the job of [`NetworkState`](super::NetworkState).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::net::Ipv4Addr;

use shared_types::{Ipv4Net, NodeId, Rule};

use crate::error::NetworkStateError;

/// A switch: adjacency list, rule table and directly attached hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    /// Switch identifier
    pub id: NodeId,
    /// Neighbours in topology order
    pub next_hops: Vec<NodeId>,
    /// Installed rules in installation order (duplicates allowed)
    pub rules: Vec<Rule>,
    /// Hosts attached to this switch
    pub connected_hosts: BTreeSet<NodeId>,
}

impl Switch {
    /// Create a switch with no rules and no hosts.
    pub fn new(id: NodeId, next_hops: Vec<NodeId>) -> Self {
        Self {
            id,
            next_hops,
            rules: Vec::new(),
            connected_hosts: BTreeSet::new(),
        }
    }

    /// Longest-prefix match for `addr`.
    ///
    /// Among rules with the same prefix the earliest installed wins.
    pub fn lookup(&self, addr: Ipv4Addr) -> Option<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.prefix.contains(&addr))
            .min_by_key(|rule| Reverse(rule.prefix.prefix_len()))
    }

    /// The rule that takes effect for exactly `prefix`, if any.
    pub fn effective_rule(&self, prefix: &Ipv4Net) -> Option<&Rule> {
        self.rules.iter().find(|rule| &rule.prefix == prefix)
    }

    /// Drops the most recently installed copy, so add-then-remove restores
    /// the table exactly.
    fn remove_rule(&mut self, rule: &Rule) -> bool {
        match self.rules.iter().rposition(|r| r == rule) {
            Some(index) => {
                self.rules.remove(index);
                true
            }
            None => false,
        }
    }
}

/// A host and the switch it is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host identifier
    pub id: NodeId,
    /// Owning switch
    pub switch_id: NodeId,
}

/// All switches and hosts of the network.
#[derive(Debug, Clone, Default)]
pub struct ForwardingModel {
    switches: BTreeMap<NodeId, Switch>,
    hosts: BTreeMap<NodeId, Host>,
}

impl ForwardingModel {
    /// Empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a switch.
    pub fn add_switch(&mut self, id: NodeId, next_hops: Vec<NodeId>) -> Result<(), NetworkStateError> {
        if self.switches.contains_key(&id) || self.hosts.contains_key(&id) {
            return Err(NetworkStateError::DuplicateSwitch(id));
        }
        self.switches.insert(id.clone(), Switch::new(id, next_hops));
        Ok(())
    }

    /// Register a host and attach it to its switch.
    pub fn add_host(&mut self, id: NodeId, switch_id: NodeId) -> Result<(), NetworkStateError> {
        if self.hosts.contains_key(&id) || self.switches.contains_key(&id) {
            return Err(NetworkStateError::DuplicateHost(id));
        }
        let switch = self
            .switches
            .get_mut(&switch_id)
            .ok_or_else(|| NetworkStateError::HostOnUnknownSwitch {
                host: id.clone(),
                switch: switch_id.clone(),
            })?;
        switch.connected_hosts.insert(id.clone());
        self.hosts.insert(id.clone(), Host { id, switch_id });
        Ok(())
    }

    /// Check that a rule refers only to known nodes.
    ///
    /// The switch must exist; the next hop must be a switch or a host.
    pub fn validate_rule(&self, rule: &Rule) -> Result<(), NetworkStateError> {
        if !self.switches.contains_key(&rule.switch_id) {
            return Err(NetworkStateError::UnknownSwitch(rule.switch_id.clone()));
        }
        if !self.switches.contains_key(&rule.next_hop) && !self.hosts.contains_key(&rule.next_hop) {
            return Err(NetworkStateError::UnknownNextHop(rule.next_hop.clone()));
        }
        Ok(())
    }

    /// Append a rule to its switch's table.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), NetworkStateError> {
        self.validate_rule(&rule)?;
        let switch = self
            .switches
            .get_mut(&rule.switch_id)
            .ok_or_else(|| NetworkStateError::UnknownSwitch(rule.switch_id.clone()))?;
        switch.rules.push(rule);
        Ok(())
    }

    /// Remove the latest instance of `rule`. Returns `false` if none was
    /// installed.
    pub fn remove_rule(&mut self, rule: &Rule) -> Result<bool, NetworkStateError> {
        let switch = self
            .switches
            .get_mut(&rule.switch_id)
            .ok_or_else(|| NetworkStateError::UnknownSwitch(rule.switch_id.clone()))?;
        Ok(switch.remove_rule(rule))
    }

    /// Longest-prefix match for `addr` at `switch_id`.
    pub fn lookup(&self, switch_id: &NodeId, addr: Ipv4Addr) -> Option<&Rule> {
        self.switches.get(switch_id)?.lookup(addr)
    }

    /// Look up a switch.
    pub fn switch(&self, id: &NodeId) -> Option<&Switch> {
        self.switches.get(id)
    }

    /// Look up a host.
    pub fn host(&self, id: &NodeId) -> Option<&Host> {
        self.hosts.get(id)
    }

    /// Whether `id` names a host.
    pub fn is_host(&self, id: &NodeId) -> bool {
        self.hosts.contains_key(id)
    }

    /// Switches in id order.
    pub fn switches(&self) -> impl Iterator<Item = &Switch> {
        self.switches.values()
    }

    /// Hosts in id order.
    pub fn hosts(&self) -> impl Iterator<Item = &Host> {
        self.hosts.values()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Total installed rule instances across all switches.
    pub fn rule_count(&self) -> usize {
        self.switches.values().map(|s| s.rules.len()).sum()
    }
}
