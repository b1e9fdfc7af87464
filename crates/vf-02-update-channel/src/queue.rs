//! # Mutation Queue
//!
//! Connection workers hand rule changes to a single writer through a bounded
//! channel and wait for the verdict on a oneshot. The writer applies one
//! mutation and its re-verification at a time, in arrival order.
//!
//! A submitted mutation always runs to completion, even if the submitting
//! connection goes away while it waits.

use std::sync::Arc;

use shared_types::Rule;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;
use vf_01_verification::{VerificationReport, VerifierApi, VerifierError};

use crate::error::ChannelError;

/// A rule change waiting for the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add(Rule),
    Remove(Rule),
}

type Verdict = Result<VerificationReport, VerifierError>;

struct Job {
    mutation: Mutation,
    reply: oneshot::Sender<Verdict>,
}

/// Sending side of the queue. Cheap to clone.
#[derive(Clone)]
pub struct MutationQueue {
    tx: mpsc::Sender<Job>,
}

impl MutationQueue {
    /// Start the writer on a blocking thread.
    ///
    /// The writer stops once every `MutationQueue` clone is dropped and the
    /// queue has drained.
    pub fn spawn(service: Arc<dyn VerifierApi>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Job>(capacity);

        let writer = tokio::task::spawn_blocking(move || {
            while let Some(job) = rx.blocking_recv() {
                let verdict = match &job.mutation {
                    Mutation::Add(rule) => service.add_rule(rule.clone()),
                    Mutation::Remove(rule) => service.remove_rule(rule),
                };
                if job.reply.send(verdict).is_err() {
                    debug!(mutation = ?job.mutation, "[vf-02] Submitter left before verdict");
                }
            }
            debug!("[vf-02] Mutation queue drained, writer stopping");
        });

        (Self { tx }, writer)
    }

    /// Enqueue a mutation and wait for its verdict.
    pub async fn submit(&self, mutation: Mutation) -> Result<Verdict, ChannelError> {
        let (reply, verdict) = oneshot::channel();
        self.tx
            .send(Job { mutation, reply })
            .await
            .map_err(|_| ChannelError::QueueClosed)?;
        verdict.await.map_err(|_| ChannelError::QueueClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vf_01_verification::{parse_topology, VerifierService};

    fn service() -> Arc<dyn VerifierApi> {
        let network = parse_topology("hdr\nS1:S2\nS2:S1\nH\nH1:S1\nH2:S2\nR\n")
            .unwrap()
            .build()
            .unwrap();
        Arc::new(VerifierService::new(network))
    }

    fn rule(s: &str) -> Rule {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_submit_returns_verdict() {
        let svc = service();
        let (queue, writer) = MutationQueue::spawn(svc.clone(), 4);

        let report = queue
            .submit(Mutation::Add(rule("S1-10.0.0.0/24-S2")))
            .await
            .unwrap()
            .unwrap();
        assert!(report.well_formed);

        let report = queue
            .submit(Mutation::Add(rule("S2-10.0.0.0/24-S1")))
            .await
            .unwrap()
            .unwrap();
        assert!(!report.well_formed);

        drop(queue);
        writer.await.unwrap();
        assert_eq!(svc.status().rules, 2);
    }

    #[tokio::test]
    async fn test_rejection_passes_through() {
        let (queue, _writer) = MutationQueue::spawn(service(), 1);
        let verdict = queue
            .submit(Mutation::Remove(rule("S7-10.0.0.0/24-S2")))
            .await
            .unwrap();
        assert!(matches!(verdict, Err(VerifierError::Network(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_submitters_are_serialized() {
        let svc = service();
        let (queue, writer) = MutationQueue::spawn(svc.clone(), 2);

        let mut tasks = Vec::new();
        for i in 0..16u8 {
            let queue = queue.clone();
            tasks.push(tokio::spawn(async move {
                let r: Rule = format!("S1-10.{i}.0.0/16-H1").parse().unwrap();
                queue.submit(Mutation::Add(r)).await
            }));
        }
        for task in tasks {
            let report = task.await.unwrap().unwrap().unwrap();
            assert!(report.well_formed);
        }

        drop(queue);
        writer.await.unwrap();
        assert_eq!(svc.status().rules, 16);
        assert!(svc.current_errors().is_empty());
    }
}
