//! Cross-crate integration tests.

pub mod scenarios;
pub mod update_channel;
