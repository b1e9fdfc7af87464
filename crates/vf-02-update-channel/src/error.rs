//! Error types for the update channel

use shared_types::RuleParseError;
use thiserror::Error;

/// A controller message that does not match the command grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("command is not valid UTF-8")]
    InvalidUtf8,

    #[error("missing '#' between operation and argument")]
    MissingSeparator,

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    #[error("invalid rule: {0}")]
    InvalidRule(#[from] RuleParseError),

    #[error("invalid switch id: {0}")]
    InvalidSwitchId(RuleParseError),
}

/// Errors from running the channel itself
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Invalid channel configuration: {0}")]
    Config(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation queue closed")]
    QueueClosed,
}
