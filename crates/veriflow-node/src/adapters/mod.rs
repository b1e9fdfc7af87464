//! Adapters connecting the verifier to node infrastructure.

pub mod metrics;

pub use metrics::PrometheusMetrics;
