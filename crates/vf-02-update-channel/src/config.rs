//! Update channel configuration

use serde::{Deserialize, Serialize};

use crate::error::ChannelError;

/// Listener, worker pool and queue sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Address to listen on
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Connections served at once; further clients wait in the accept backlog
    pub max_connections: usize,
    /// Mutations waiting for the single writer
    pub queue_capacity: usize,
    /// Longest accepted command line, in bytes
    pub max_line_bytes: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6655,
            max_connections: 16,
            queue_capacity: 64,
            max_line_bytes: 4096,
        }
    }
}

impl ChannelConfig {
    /// `host:port` for binding.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject sizes that would stall the channel.
    pub fn validate(&self) -> Result<(), ChannelError> {
        if self.host.trim().is_empty() {
            return Err(ChannelError::Config("host must not be empty".into()));
        }
        if self.max_connections == 0 {
            return Err(ChannelError::Config("max_connections must be positive".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ChannelError::Config("queue_capacity must be positive".into()));
        }
        if self.max_line_bytes == 0 {
            return Err(ChannelError::Config("max_line_bytes must be positive".into()));
        }
        Ok(())
    }
}
