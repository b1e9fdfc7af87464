//! Command handler
//!
//! Routes mutations through the [`MutationQueue`] and serves queries directly
//! from the verifier's read lock.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use veriflow_telemetry::{metric_inc, COMMANDS};
use vf_01_verification::{VerificationReport, VerifierApi, VerifierError};

use crate::ports::CommandDispatcher;
use crate::protocol::{Command, Response};
use crate::queue::{Mutation, MutationQueue};

/// Default [`CommandDispatcher`] backed by a verifier and its mutation queue.
pub struct CommandHandler {
    service: Arc<dyn VerifierApi>,
    queue: MutationQueue,
}

impl CommandHandler {
    pub fn new(service: Arc<dyn VerifierApi>, queue: MutationQueue) -> Self {
        Self { service, queue }
    }

    async fn mutate(&self, mutation: Mutation) -> Response {
        match self.queue.submit(mutation).await {
            Ok(verdict) => verdict_response(verdict),
            Err(e) => {
                error!(error = %e, "[vf-02] Mutation not applied");
                Response::Aborted(e.to_string())
            }
        }
    }

    async fn query<T, F>(&self, read: F) -> Result<T, Response>
    where
        T: Send + 'static,
        F: FnOnce(&dyn VerifierApi) -> Result<T, VerifierError> + Send + 'static,
    {
        let service = self.service.clone();
        match tokio::task::spawn_blocking(move || read(service.as_ref())).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(Response::Rejected(e.to_string())),
            Err(e) => Err(Response::Aborted(e.to_string())),
        }
    }
}

fn verdict_response(verdict: Result<VerificationReport, VerifierError>) -> Response {
    match verdict {
        Ok(report) if report.well_formed => Response::Success,
        Ok(report) => Response::Violations(report.new_errors),
        Err(VerifierError::Network(e)) => Response::Rejected(e.to_string()),
        Err(e @ VerifierError::Verification(_)) => Response::Aborted(e.to_string()),
    }
}

#[async_trait]
impl CommandDispatcher for CommandHandler {
    async fn dispatch(&self, command: Command) -> Response {
        let name = command.name();
        let response = match command {
            Command::Handshake => {
                info!("[vf-02] Received hello from controller");
                Response::Hello
            }
            Command::AddRule(rule) => self.mutate(Mutation::Add(rule)).await,
            Command::RemoveRule(rule) => self.mutate(Mutation::Remove(rule)).await,
            Command::ListFlows(switch) => {
                let id = switch.clone();
                match self.query(move |svc| svc.list_flows(&id)).await {
                    Ok(rules) => Response::Flows { switch, rules },
                    Err(response) => response,
                }
            }
            Command::Status => match self.query(|svc| Ok(svc.status())).await {
                Ok(status) => Response::Status(status),
                Err(response) => response,
            },
        };

        if response.is_failure() {
            warn!(command = name, response = %response, "[vf-02] Command failed");
        } else {
            info!(command = name, response = %response, "[vf-02] Command handled");
        }
        metric_inc!(COMMANDS, &[name, response.outcome()]);
        response
    }
}
