//! # Verification Engine
//!
//! Walks the forwarding graph of each equivalence class from every host's
//! switch and classifies the walks that fail to reach a host.
//!
//! ## Walk
//!
//! Starting at the switch owning a host, repeatedly take the longest-prefix
//! match for the EC's representative address:
//!
//! - next hop is a host: delivered, no error;
//! - next hop is a switch already on the path: [`ErrorKind::Loop`];
//! - next hop is a new switch: continue from there;
//! - no matching rule: delivered if the switch has a host attached, otherwise
//!   [`ErrorKind::BlackHole`].
//!
//! A walk that runs past `switch_count + 1` hops without detecting a loop
//! means the visited-set bookkeeping is broken and aborts the pass with
//! [`VerificationError::WalkBoundExceeded`].
//!
//! ## Error set
//!
//! Errors are kept per EC. A full pass replaces the whole set; a scoped pass
//! replaces only the entries of the ECs it covers (and drops retired ones).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use shared_types::NodeId;
use tracing::trace;

use super::forwarding::ForwardingModel;
use super::network::NetworkState;
use super::trie::{AffectedEcs, EquivalenceClass};
use crate::error::VerificationError;

/// Kind of structural violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorKind {
    Loop,
    BlackHole,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Loop => f.write_str("loop"),
            ErrorKind::BlackHole => f.write_str("black hole"),
        }
    }
}

/// One violation found by one walk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetworkError {
    pub kind: ErrorKind,
    pub ec: EquivalenceClass,
    /// Switch the walk started from
    pub starting_switch: NodeId,
    /// Switch where the walk stopped
    pub detected_at: NodeId,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} starting at {} (detected at {})",
            self.kind, self.ec, self.starting_switch, self.detected_at
        )
    }
}

/// Switches visited by a single walk.
#[derive(Debug, Default)]
pub struct ForwardingGraph {
    path: Vec<NodeId>,
    visited: HashSet<NodeId>,
}

impl ForwardingGraph {
    fn starting_at(switch_id: NodeId) -> Self {
        let mut graph = Self::default();
        graph.visit(switch_id);
        graph
    }

    /// Record a switch; returns `false` if it was already on the path.
    fn visit(&mut self, switch_id: NodeId) -> bool {
        if !self.visited.insert(switch_id.clone()) {
            return false;
        }
        self.path.push(switch_id);
        true
    }

    /// Visited switches in order.
    fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn hops(&self) -> usize {
        self.path.len()
    }
}

/// Which ECs a pass covers.
#[derive(Debug, Clone, Copy)]
pub enum VerificationScope<'a> {
    /// Every live EC; discards all earlier findings.
    All,
    /// Only the given ECs.
    Ecs(&'a AffectedEcs),
}

/// Summary of one verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    /// No violation found during this pass
    pub well_formed: bool,
    /// ECs walked
    pub checked_ecs: usize,
    /// (EC, host) walks performed
    pub walks: usize,
    /// Violations found during this pass
    pub found: Vec<NetworkError>,
}

/// Holds the current violation set and runs verification passes.
#[derive(Debug, Default)]
pub struct VerificationEngine {
    errors: BTreeMap<EquivalenceClass, Vec<NetworkError>>,
}

impl VerificationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the ECs in `scope` and update the stored error set.
    ///
    /// Returns whether the pass found no violation. On
    /// [`VerificationError::WalkBoundExceeded`] the stored errors of the
    /// scope are left cleared.
    pub fn check_wellformedness(
        &mut self,
        network: &NetworkState,
        scope: VerificationScope<'_>,
    ) -> Result<VerificationOutcome, VerificationError> {
        let targets: Vec<EquivalenceClass> = match scope {
            VerificationScope::All => {
                self.errors.clear();
                network.trie().all_ecs().into_iter().collect()
            }
            VerificationScope::Ecs(affected) => {
                for ec in affected.retired.iter().chain(affected.live.iter()) {
                    self.errors.remove(ec);
                }
                affected.live.iter().copied().collect()
            }
        };

        let model = network.model();
        let mut outcome = VerificationOutcome {
            well_formed: true,
            checked_ecs: targets.len(),
            walks: 0,
            found: Vec::new(),
        };

        for ec in targets {
            let mut found = Vec::new();
            for host in model.hosts() {
                outcome.walks += 1;
                if let Some(error) = walk(model, ec, &host.switch_id)? {
                    found.push(error);
                }
            }
            if !found.is_empty() {
                outcome.found.extend(found.iter().cloned());
                self.errors.insert(ec, found);
            }
        }

        outcome.well_formed = outcome.found.is_empty();
        Ok(outcome)
    }

    /// All currently recorded violations, ordered by EC.
    pub fn errors(&self) -> impl Iterator<Item = &NetworkError> {
        self.errors.values().flatten()
    }

    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Whether the last passes left no violation anywhere.
    pub fn is_well_formed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Walk one EC from one starting switch.
fn walk(
    model: &ForwardingModel,
    ec: EquivalenceClass,
    start: &NodeId,
) -> Result<Option<NetworkError>, VerificationError> {
    let addr = ec.representative();
    let bound = model.switch_count() + 1;
    let mut graph = ForwardingGraph::starting_at(start.clone());
    let mut current = start.clone();

    let error = |kind, at: &NodeId| NetworkError {
        kind,
        ec,
        starting_switch: start.clone(),
        detected_at: at.clone(),
    };

    loop {
        if graph.hops() > bound {
            return Err(VerificationError::WalkBoundExceeded {
                ec: ec.to_string(),
                start: start.clone(),
                bound,
            });
        }

        let Some(switch) = model.switch(&current) else {
            return Ok(Some(error(ErrorKind::BlackHole, &current)));
        };

        let Some(rule) = switch.lookup(addr) else {
            if switch.connected_hosts.is_empty() {
                return Ok(Some(error(ErrorKind::BlackHole, &current)));
            }
            return Ok(None);
        };

        if model.is_host(&rule.next_hop) {
            return Ok(None);
        }
        if !graph.visit(rule.next_hop.clone()) {
            trace!(ec = %ec, path = ?graph.path(), "[vf-01] Loop closes at {}", rule.next_hop);
            return Ok(Some(error(ErrorKind::Loop, &rule.next_hop)));
        }
        current = rule.next_hop.clone();
    }
}
