//! Metrics hooks for verification operations
//!
//! The service reports through [`VerifierMetrics`]; the node wires a
//! Prometheus-backed implementation, tests use [`CountingMetrics`].
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use vf_01_verification::metrics::CountingMetrics;
//!
//! let metrics = Arc::new(CountingMetrics::new());
//! let service = VerifierService::with_metrics(network, metrics.clone());
//! service.add_rule(rule)?;
//! assert_eq!(metrics.snapshot().rules_added, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{ErrorKind, VerificationOutcome};

/// Recorder for verifier events. Every method defaults to a no-op.
pub trait VerifierMetrics: Send + Sync {
    fn record_rule_added(&self) {}

    fn record_rule_removed(&self) {}

    /// One verification pass finished.
    fn record_verification(&self, _outcome: &VerificationOutcome, _duration: Duration) {}

    /// Live EC count after a change.
    fn set_ec_count(&self, _count: usize) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpMetrics;

impl VerifierMetrics for NoOpMetrics {}

/// In-process counters
#[derive(Debug, Default)]
pub struct CountingMetrics {
    pub rules_added: AtomicU64,
    pub rules_removed: AtomicU64,
    pub passes: AtomicU64,
    pub loops_found: AtomicU64,
    pub black_holes_found: AtomicU64,
    pub ec_count: AtomicU64,
    /// Cumulative verification time in nanoseconds
    pub verification_time_ns: AtomicU64,
}

impl CountingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rules_added: self.rules_added.load(Ordering::Relaxed),
            rules_removed: self.rules_removed.load(Ordering::Relaxed),
            passes: self.passes.load(Ordering::Relaxed),
            loops_found: self.loops_found.load(Ordering::Relaxed),
            black_holes_found: self.black_holes_found.load(Ordering::Relaxed),
            ec_count: self.ec_count.load(Ordering::Relaxed),
            avg_verification_ns: self.avg_verification_time_ns(),
        }
    }

    /// Average pass duration in nanoseconds
    pub fn avg_verification_time_ns(&self) -> u64 {
        let total = self.verification_time_ns.load(Ordering::Relaxed);
        let count = self.passes.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }
}

impl VerifierMetrics for CountingMetrics {
    fn record_rule_added(&self) {
        self.rules_added.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rule_removed(&self) {
        self.rules_removed.fetch_add(1, Ordering::Relaxed);
    }

    fn record_verification(&self, outcome: &VerificationOutcome, duration: Duration) {
        self.passes.fetch_add(1, Ordering::Relaxed);
        self.verification_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        for error in &outcome.found {
            match error.kind {
                ErrorKind::Loop => self.loops_found.fetch_add(1, Ordering::Relaxed),
                ErrorKind::BlackHole => self.black_holes_found.fetch_add(1, Ordering::Relaxed),
            };
        }
    }

    fn set_ec_count(&self, count: usize) {
        self.ec_count.store(count as u64, Ordering::Relaxed);
    }
}

/// Point-in-time copy of [`CountingMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub rules_added: u64,
    pub rules_removed: u64,
    pub passes: u64,
    pub loops_found: u64,
    pub black_holes_found: u64,
    pub ec_count: u64,
    pub avg_verification_ns: u64,
}
