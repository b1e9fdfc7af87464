//! # VeriFlow Telemetry
//!
//! Structured logging and Prometheus metrics shared by every VeriFlow crate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use veriflow_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `VF_SERVICE_NAME` | `veriflow` | Service name in the start-up log |
//! | `VF_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `VF_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `VF_JSON_LOGS` | `false` | JSON instead of pretty logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, COMMANDS, CONNECTIONS_ACTIVE, EC_COUNT,
    REGISTRY, RULES_ADDED, RULES_REMOVED, VERIFICATION_DURATION, VERIFICATION_PASSES,
    VIOLATIONS_FOUND,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the logging subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
