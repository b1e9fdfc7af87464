//! Prometheus-backed [`VerifierMetrics`].

use std::time::Duration;

use veriflow_telemetry::{
    EC_COUNT, RULES_ADDED, RULES_REMOVED, VERIFICATION_DURATION, VERIFICATION_PASSES,
    VIOLATIONS_FOUND,
};
use vf_01_verification::{ErrorKind, VerificationOutcome, VerifierMetrics};

/// Records verifier events into the global telemetry registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusMetrics;

impl VerifierMetrics for PrometheusMetrics {
    fn record_rule_added(&self) {
        RULES_ADDED.inc();
    }

    fn record_rule_removed(&self) {
        RULES_REMOVED.inc();
    }

    fn record_verification(&self, outcome: &VerificationOutcome, duration: Duration) {
        VERIFICATION_PASSES.inc();
        VERIFICATION_DURATION.observe(duration.as_secs_f64());
        for error in &outcome.found {
            let kind = match error.kind {
                ErrorKind::Loop => "loop",
                ErrorKind::BlackHole => "black_hole",
            };
            VIOLATIONS_FOUND.with_label_values(&[kind]).inc();
        }
    }

    fn set_ec_count(&self, count: usize) {
        EC_COUNT.set(count as f64);
    }
}
