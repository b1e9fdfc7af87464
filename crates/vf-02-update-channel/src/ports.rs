//! Inbound port of the update channel.

use async_trait::async_trait;

use crate::protocol::{Command, Response};

/// Executes parsed controller commands (Driving Port)
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Execute one command. Always produces a reply.
    async fn dispatch(&self, command: Command) -> Response;
}
