//! File-backed topology source.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::{parse_topology, NetworkState};
use crate::error::TopologyError;
use crate::ports::TopologySource;

/// Reads a topology description from a file on disk.
#[derive(Clone, Debug)]
pub struct FileTopologySource {
    path: PathBuf,
}

impl FileTopologySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TopologySource for FileTopologySource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<String, TopologyError> {
        fs::read_to_string(&self.path).map_err(|e| TopologyError::Io {
            path: self.describe(),
            reason: e.to_string(),
        })
    }
}

/// Read, parse and bulk-load a topology into a fresh [`NetworkState`].
pub fn load_topology(source: &dyn TopologySource) -> Result<NetworkState, TopologyError> {
    let text = source.read()?;
    let description = parse_topology(&text)?;
    let network = description.build()?;

    info!(
        source = %source.describe(),
        switches = network.model().switch_count(),
        hosts = network.model().host_count(),
        rules = network.model().rule_count(),
        ecs = network.trie().ec_count(),
        "[vf-01] Topology loaded"
    );
    Ok(network)
}
