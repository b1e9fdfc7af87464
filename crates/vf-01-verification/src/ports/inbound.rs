//! Inbound Ports (Driving Ports)
//!
//! The API external callers use to mutate and inspect the verified network.
//! Every mutation is applied and re-verified as one unit.

use shared_types::{NodeId, Rule};

use crate::domain::NetworkError;
use crate::error::VerifierError;

/// Result of a mutation followed by its re-verification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    /// The re-verified ECs hold no violation
    pub well_formed: bool,
    /// ECs re-walked after the change
    pub affected_ecs: usize,
    /// Live ECs after the change
    pub ec_count: usize,
    /// Violations found by this re-verification
    pub new_errors: Vec<NetworkError>,
    /// Violations recorded network-wide after the change
    pub total_errors: usize,
}

/// Read-only snapshot of the network size and health
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkStatus {
    pub switches: usize,
    pub hosts: usize,
    pub rules: usize,
    pub ec_count: usize,
    pub errors: usize,
}

/// Primary verifier API (Driving Port)
pub trait VerifierApi: Send + Sync {
    /// Install a rule and re-verify the ECs it affects.
    fn add_rule(&self, rule: Rule) -> Result<VerificationReport, VerifierError>;

    /// Remove one rule instance and re-verify the ECs it affects.
    ///
    /// Removing an absent rule succeeds with nothing re-verified.
    fn remove_rule(&self, rule: &Rule) -> Result<VerificationReport, VerifierError>;

    /// Re-verify every EC, discarding earlier findings.
    fn verify_all(&self) -> Result<VerificationReport, VerifierError>;

    /// Rules installed on a switch, in installation order.
    fn list_flows(&self, switch_id: &NodeId) -> Result<Vec<Rule>, VerifierError>;

    fn status(&self) -> NetworkStatus;

    /// Violations currently recorded.
    fn current_errors(&self) -> Vec<NetworkError>;
}
