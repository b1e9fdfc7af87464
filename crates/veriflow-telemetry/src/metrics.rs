//! Prometheus metrics for VeriFlow.
//!
//! All metrics follow the naming convention: `vf_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., rules_added_total)
//! - **Gauge**: Value that can go up or down (e.g., equivalence_classes)
//! - **Histogram**: Distribution of values (e.g., verification_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // NETWORK STATE
    // =========================================================================

    /// Rules installed
    pub static ref RULES_ADDED: Counter = Counter::new(
        "vf_network_rules_added_total",
        "Total number of rules installed"
    ).expect("metric creation failed");

    /// Rules removed
    pub static ref RULES_REMOVED: Counter = Counter::new(
        "vf_network_rules_removed_total",
        "Total number of rule instances removed"
    ).expect("metric creation failed");

    /// Live equivalence classes
    pub static ref EC_COUNT: Gauge = Gauge::new(
        "vf_trie_equivalence_classes",
        "Number of live equivalence classes"
    ).expect("metric creation failed");

    // =========================================================================
    // VERIFICATION
    // =========================================================================

    /// Verification passes
    pub static ref VERIFICATION_PASSES: Counter = Counter::new(
        "vf_verification_passes_total",
        "Total number of verification passes"
    ).expect("metric creation failed");

    /// Violations found, by kind
    pub static ref VIOLATIONS_FOUND: CounterVec = CounterVec::new(
        Opts::new("vf_verification_violations_total", "Violations found by verification"),
        &["kind"]  // kind: loop/black_hole
    ).expect("metric creation failed");

    /// Verification pass duration
    pub static ref VERIFICATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "vf_verification_duration_seconds",
            "Time spent in one verification pass"
        ).buckets(exponential_buckets(0.00001, 2.0, 20).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // UPDATE CHANNEL
    // =========================================================================

    /// Commands handled, by command and outcome
    pub static ref COMMANDS: CounterVec = CounterVec::new(
        Opts::new("vf_channel_commands_total", "Commands received from the controller"),
        &["command", "outcome"]  // outcome: success/fail/rejected
    ).expect("metric creation failed");

    /// Open controller connections
    pub static ref CONNECTIONS_ACTIVE: Gauge = Gauge::new(
        "vf_channel_connections_active",
        "Number of open controller connections"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; already registered collectors are skipped.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Network
        Box::new(RULES_ADDED.clone()),
        Box::new(RULES_REMOVED.clone()),
        Box::new(EC_COUNT.clone()),
        // Verification
        Box::new(VERIFICATION_PASSES.clone()),
        Box::new(VIOLATIONS_FOUND.clone()),
        Box::new(VERIFICATION_DURATION.clone()),
        // Channel
        Box::new(COMMANDS.clone()),
        Box::new(CONNECTIONS_ACTIVE.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_counter_increment() {
        RULES_ADDED.inc();
        assert!(RULES_ADDED.get() >= 1.0);
    }

    #[test]
    fn test_gauge_set() {
        EC_COUNT.set(25.0);
        assert_eq!(EC_COUNT.get(), 25.0);
    }

    #[test]
    fn test_encode_contains_registered_metric() {
        register_metrics().unwrap();
        COMMANDS.with_label_values(&["add", "success"]).inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("vf_channel_commands_total"));
    }
}
