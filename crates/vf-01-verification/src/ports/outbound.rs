//! Outbound Ports (Driven Ports)
//!
//! Where the start-up topology description is read from.

use crate::error::TopologyError;

/// Source of topology file text (Driven Port)
pub trait TopologySource: Send + Sync {
    /// Human-readable origin, used in logs and errors.
    fn describe(&self) -> String;

    /// Read the whole description.
    fn read(&self) -> Result<String, TopologyError>;
}
