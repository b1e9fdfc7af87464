//! # Node Runtime
//!
//! Owns the verifier and the update channel for the lifetime of the process.
//! Shutdown is broadcast over a `watch` channel: the listener stops
//! accepting, in-flight connections finish, and the mutation writer exits
//! once every queue handle is gone.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use veriflow_telemetry::encode_metrics;
use vf_01_verification::{
    load_topology, FileTopologySource, NetworkState, VerifierApi, VerifierService,
};
use vf_02_update_channel::{ChannelError, CommandHandler, MutationQueue, UpdateServer};

use crate::adapters::PrometheusMetrics;
use crate::config::NodeConfig;

/// The running verifier node.
pub struct NodeRuntime {
    config: NodeConfig,
    service: Arc<VerifierService>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    server: Option<JoinHandle<Result<(), ChannelError>>>,
}

impl NodeRuntime {
    /// Load the configured topology and run the initial full verification.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let path = config.topology()?.to_path_buf();
        let network = load_topology(&FileTopologySource::new(path.clone()))
            .with_context(|| format!("Failed to load topology from {}", path.display()))?;
        Self::with_network(config, network)
    }

    /// Wrap an already loaded network and run the initial full verification.
    pub fn with_network(config: NodeConfig, network: NetworkState) -> Result<Self> {
        let service = Arc::new(VerifierService::with_metrics(
            network,
            Arc::new(PrometheusMetrics),
        ));
        let report = service
            .verify_all()
            .context("Initial verification failed")?;
        info!(
            ecs = report.ec_count,
            errors = report.total_errors,
            "[vf-01] Initial verification complete"
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Ok(Self {
            config,
            service,
            shutdown_tx,
            shutdown_rx,
            server: None,
        })
    }

    /// Start the mutation writer and the update channel.
    ///
    /// Returns the bound address, which differs from the configured one
    /// when port 0 is requested.
    pub async fn start(&mut self) -> Result<SocketAddr> {
        info!("===========================================");
        info!("  VeriFlow Node Starting");
        info!("===========================================");
        if let Ok(path) = self.config.topology() {
            info!("  Topology: {}", path.display());
        }
        info!("  Listen: {}", self.config.channel.listen_addr());
        info!("  Workers: {}", self.config.channel.max_connections);
        info!("  Queue: {}", self.config.channel.queue_capacity);
        info!("===========================================");

        let service: Arc<dyn VerifierApi> = self.service.clone();
        let (queue, _writer) =
            MutationQueue::spawn(service.clone(), self.config.channel.queue_capacity);
        let handler = Arc::new(CommandHandler::new(service, queue));
        let server = UpdateServer::new(self.config.channel.clone(), handler);

        let listener = server.bind().await?;
        let addr = listener.local_addr()?;
        self.server = Some(tokio::spawn(server.run(listener, self.shutdown_rx.clone())));

        info!(addr = %addr, "Node is running");
        Ok(addr)
    }

    /// The verifier behind the channel.
    pub fn service(&self) -> Arc<VerifierService> {
        self.service.clone()
    }

    /// Signal shutdown and wait for the listener to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        info!("Initiating graceful shutdown...");
        let _ = self.shutdown_tx.send(true);

        if let Some(server) = self.server.take() {
            match server.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!(error = %e, "Update channel failed"),
                Err(e) => error!(error = %e, "Update channel task panicked"),
            }
        }

        match encode_metrics() {
            Ok(text) => debug!(metrics = %text, "Final metrics"),
            Err(e) => debug!(error = %e, "Metrics unavailable"),
        }
        info!("Shutdown complete");
        Ok(())
    }
}
