//! Verifier Service
//!
//! Implements [`VerifierApi`] over a single owned [`NetworkState`].
//!
//! ## Locking
//!
//! The network and the engine's error set live behind one
//! `parking_lot::RwLock`. Mutations hold the write guard from validation
//! through re-verification, so a second mutation always sees a consistent
//! partition. Queries take the read guard and may run concurrently with
//! each other.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use shared_types::{NodeId, Rule};
use tracing::{debug, error, info, warn};

use crate::domain::{
    AffectedEcs, NetworkError, NetworkState, VerificationEngine, VerificationOutcome,
    VerificationScope,
};
use crate::error::{NetworkStateError, VerifierError};
use crate::metrics::{NoOpMetrics, VerifierMetrics};
use crate::ports::{NetworkStatus, VerificationReport, VerifierApi};

struct VerifierState {
    network: NetworkState,
    engine: VerificationEngine,
}

/// Verifier service implementation
pub struct VerifierService {
    state: RwLock<VerifierState>,
    metrics: Arc<dyn VerifierMetrics>,
}

impl VerifierService {
    /// Wrap a loaded network. No verification is run yet.
    pub fn new(network: NetworkState) -> Self {
        Self::with_metrics(network, Arc::new(NoOpMetrics))
    }

    pub fn with_metrics(network: NetworkState, metrics: Arc<dyn VerifierMetrics>) -> Self {
        metrics.set_ec_count(network.trie().ec_count());
        Self {
            state: RwLock::new(VerifierState {
                network,
                engine: VerificationEngine::new(),
            }),
            metrics,
        }
    }

    /// Apply one mutation and re-verify what it touched, under the write lock.
    fn apply<F>(
        &self,
        action: &'static str,
        subject: &Rule,
        mutate: F,
    ) -> Result<VerificationReport, VerifierError>
    where
        F: FnOnce(&mut NetworkState) -> Result<AffectedEcs, NetworkStateError>,
    {
        let mut guard = self.state.write();
        let VerifierState { network, engine } = &mut *guard;

        let affected = mutate(network).map_err(|e| {
            warn!(rule = %subject, error = %e, "[vf-01] Rejected {}", action);
            e
        })?;
        debug!(
            rule = %subject,
            live = affected.live.len(),
            retired = affected.retired.len(),
            "[vf-01] Applied {}",
            action
        );

        let outcome = self.verify(network, engine, VerificationScope::Ecs(&affected))?;
        Ok(self.report(network, engine, outcome))
    }

    fn verify(
        &self,
        network: &NetworkState,
        engine: &mut VerificationEngine,
        scope: VerificationScope<'_>,
    ) -> Result<VerificationOutcome, VerifierError> {
        let started = Instant::now();
        let outcome = engine.check_wellformedness(network, scope).map_err(|e| {
            error!(error = %e, "[vf-01] Verification aborted");
            e
        })?;
        self.metrics.record_verification(&outcome, started.elapsed());
        self.metrics.set_ec_count(network.trie().ec_count());
        Ok(outcome)
    }

    fn report(
        &self,
        network: &NetworkState,
        engine: &VerificationEngine,
        outcome: VerificationOutcome,
    ) -> VerificationReport {
        let report = VerificationReport {
            well_formed: outcome.well_formed,
            affected_ecs: outcome.checked_ecs,
            ec_count: network.trie().ec_count(),
            new_errors: outcome.found,
            total_errors: engine.error_count(),
        };
        log_summary(&report);
        report
    }
}

/// Network summary after a pass: EC counts, then the verdict or one line
/// per violation.
fn log_summary(report: &VerificationReport) {
    info!(
        ecs = report.ec_count,
        affected = report.affected_ecs,
        "[vf-01] Network has {} equivalence classes, {} affected",
        report.ec_count,
        report.affected_ecs
    );
    if report.new_errors.is_empty() {
        info!("[vf-01] Network is well-formed");
        return;
    }
    for violation in &report.new_errors {
        warn!(
            kind = %violation.kind,
            ec = %violation.ec,
            addresses = violation.ec.size(),
            start = %violation.starting_switch,
            at = %violation.detected_at,
            "[vf-01] Found {}",
            violation
        );
    }
}

impl VerifierApi for VerifierService {
    fn add_rule(&self, rule: Rule) -> Result<VerificationReport, VerifierError> {
        let subject = rule.clone();
        let report = self.apply("add", &subject, move |network| network.add_rule(rule))?;
        self.metrics.record_rule_added();
        Ok(report)
    }

    fn remove_rule(&self, rule: &Rule) -> Result<VerificationReport, VerifierError> {
        let mut removed = false;
        let report = self.apply("remove", rule, |network| {
            let affected = network.delete_rule(rule)?;
            removed = affected.is_some();
            Ok(affected.unwrap_or_default())
        })?;
        if removed {
            self.metrics.record_rule_removed();
        }
        Ok(report)
    }

    fn verify_all(&self) -> Result<VerificationReport, VerifierError> {
        let mut guard = self.state.write();
        let VerifierState { network, engine } = &mut *guard;
        let outcome = self.verify(network, engine, VerificationScope::All)?;
        Ok(self.report(network, engine, outcome))
    }

    fn list_flows(&self, switch_id: &NodeId) -> Result<Vec<Rule>, VerifierError> {
        let state = self.state.read();
        Ok(state.network.rules_for(switch_id)?.to_vec())
    }

    fn status(&self) -> NetworkStatus {
        let state = self.state.read();
        let model = state.network.model();
        NetworkStatus {
            switches: model.switch_count(),
            hosts: model.host_count(),
            rules: model.rule_count(),
            ec_count: state.network.trie().ec_count(),
            errors: state.engine.error_count(),
        }
    }

    fn current_errors(&self) -> Vec<NetworkError> {
        self.state.read().engine.errors().cloned().collect()
    }
}
