//! # VeriFlow Node
//!
//! Real-time verifier for SDN forwarding state.
//!
//! ```text
//! veriflow-node <topology-file>
//! ```
//!
//! The topology may also come from `VF_TOPOLOGY` or the JSON file named by
//! `VF_CONFIG`. The node then listens for controller rule updates on
//! `127.0.0.1:6655` until Ctrl-C.

use anyhow::{Context, Result};
use veriflow_node::{NodeConfig, NodeRuntime};
use veriflow_telemetry::{init_telemetry, log_event};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::load(std::env::args().nth(1)).context("Failed to load configuration")?;
    init_telemetry(&config.telemetry).context("Failed to initialize telemetry")?;
    log_event!(info, "node", "Configuration loaded", service = %config.telemetry.service_name);

    let mut runtime = match NodeRuntime::new(config) {
        Ok(runtime) => runtime,
        Err(e) => {
            log_event!(error, "node", "Start-up failed", error = %e);
            return Err(e);
        }
    };
    runtime.start().await?;

    log_event!(info, "node", "Press Ctrl+C to stop");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await
}
