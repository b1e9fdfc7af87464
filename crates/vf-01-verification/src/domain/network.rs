//! # Network State
//!
//! Couples the forwarding model with the address trie. Every rule change goes
//! through [`NetworkState::add_rule`] or [`NetworkState::delete_rule`], which
//! validate first and only then touch either structure.
//!
//! ## Prefix reference counts
//!
//! The trie holds one mark per distinct prefix, network-wide. `rule_prefixes`
//! counts the installed rules per prefix: the first rule inserts the prefix,
//! the last removal deletes it.

use std::collections::HashMap;

use shared_types::{wildcard_bits, Ipv4Net, NodeId, Rule};
use tracing::debug;

use super::forwarding::ForwardingModel;
use super::trie::{AddressTrie, AffectedEcs};
use crate::error::NetworkStateError;

/// Switches, hosts, rules and the EC partition they induce.
#[derive(Debug, Default)]
pub struct NetworkState {
    model: ForwardingModel,
    trie: AddressTrie,
    rule_prefixes: HashMap<Ipv4Net, usize>,
}

impl NetworkState {
    /// Empty network with a single EC.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a switch and its adjacency list.
    pub fn add_switch(&mut self, id: NodeId, next_hops: Vec<NodeId>) -> Result<(), NetworkStateError> {
        self.model.add_switch(id, next_hops)
    }

    /// Register a host on an existing switch.
    pub fn add_host(&mut self, id: NodeId, switch_id: NodeId) -> Result<(), NetworkStateError> {
        self.model.add_host(id, switch_id)
    }

    /// Install a rule and return the ECs to re-verify.
    ///
    /// A rule whose prefix is new network-wide splits the trie. A rule for a
    /// known prefix leaves the partition alone; its ECs are returned only
    /// when the rule changes what its switch does for that prefix (the
    /// switch had no rule for it before). An identical duplicate yields an
    /// empty set.
    pub fn add_rule(&mut self, rule: Rule) -> Result<AffectedEcs, NetworkStateError> {
        self.model.validate_rule(&rule)?;

        let before = self.effective_next_hop(&rule.switch_id, &rule.prefix);
        let prefix = rule.prefix;
        let switch_id = rule.switch_id.clone();
        self.model.add_rule(rule)?;

        let count = self.rule_prefixes.entry(prefix).or_insert(0);
        *count += 1;
        if *count == 1 {
            debug!(
                prefix = %prefix,
                wildcard_bits = wildcard_bits(&prefix),
                "[vf-01] New prefix splits the partition"
            );
            return Ok(self.trie.insert(&prefix));
        }

        Ok(self.touched_if_changed(&switch_id, &prefix, before))
    }

    /// Remove one instance of a rule and return the ECs to re-verify.
    ///
    /// Returns `None` without touching anything when the rule is not
    /// installed.
    pub fn delete_rule(&mut self, rule: &Rule) -> Result<Option<AffectedEcs>, NetworkStateError> {
        self.model.validate_rule(rule)?;

        let before = self.effective_next_hop(&rule.switch_id, &rule.prefix);
        if !self.model.remove_rule(rule)? {
            debug!(rule = %rule, "[vf-01] Removal of absent rule ignored");
            return Ok(None);
        }

        let remaining = match self.rule_prefixes.get_mut(&rule.prefix) {
            Some(count) => {
                *count = count.saturating_sub(1);
                *count
            }
            None => 0,
        };
        if remaining == 0 {
            debug!(prefix = %rule.prefix, "[vf-01] Last rule for prefix removed");
            self.rule_prefixes.remove(&rule.prefix);
            return Ok(Some(self.trie.delete(&rule.prefix)));
        }

        Ok(Some(self.touched_if_changed(&rule.switch_id, &rule.prefix, before)))
    }

    /// Number of installed rules using exactly `prefix`.
    pub fn prefix_count(&self, prefix: &Ipv4Net) -> usize {
        self.rule_prefixes.get(prefix).copied().unwrap_or(0)
    }

    /// Rules installed on `switch_id`, in installation order.
    pub fn rules_for(&self, switch_id: &NodeId) -> Result<&[Rule], NetworkStateError> {
        self.model
            .switch(switch_id)
            .map(|s| s.rules.as_slice())
            .ok_or_else(|| NetworkStateError::UnknownSwitch(switch_id.clone()))
    }

    pub fn model(&self) -> &ForwardingModel {
        &self.model
    }

    pub fn trie(&self) -> &AddressTrie {
        &self.trie
    }

    fn effective_next_hop(&self, switch_id: &NodeId, prefix: &Ipv4Net) -> Option<NodeId> {
        self.model
            .switch(switch_id)
            .and_then(|s| s.effective_rule(prefix))
            .map(|r| r.next_hop.clone())
    }

    fn touched_if_changed(
        &self,
        switch_id: &NodeId,
        prefix: &Ipv4Net,
        before: Option<NodeId>,
    ) -> AffectedEcs {
        if self.effective_next_hop(switch_id, prefix) == before {
            return AffectedEcs::default();
        }
        AffectedEcs::touched(self.trie.ecs_within(prefix))
    }
}
