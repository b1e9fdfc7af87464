//! # Node Configuration
//!
//! Unified configuration for the verifier node.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults
//! 2. JSON file named by `VF_CONFIG`
//! 3. `VF_TOPOLOGY`, `VF_LISTEN_HOST`, `VF_LISTEN_PORT`,
//!    `VF_MAX_CONNECTIONS`, `VF_QUEUE_CAPACITY`
//! 4. First positional command-line argument (topology path)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use veriflow_telemetry::TelemetryConfig;
use vf_02_update_channel::ChannelConfig;

/// Environment variable naming the JSON configuration file.
pub const CONFIG_ENV: &str = "VF_CONFIG";

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Topology file loaded at start-up.
    pub topology_path: Option<PathBuf>,
    /// Update channel listener and queue sizing.
    pub channel: ChannelConfig,
    /// Logging setup.
    pub telemetry: TelemetryConfig,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("No topology file given (pass a path or set VF_TOPOLOGY)")]
    MissingTopology,
}

impl NodeConfig {
    /// Load from the process environment and the given positional argument.
    pub fn load(topology_arg: Option<String>) -> Result<Self, ConfigError> {
        let config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let mut config = config.with_overrides(|var| std::env::var(var).ok())?;
        config.telemetry = config.telemetry.with_env_overrides();
        if let Some(path) = topology_arg {
            config.topology_path = Some(PathBuf::from(path));
        }
        Ok(config)
    }

    /// Parse a JSON configuration file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `VF_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("VF_TOPOLOGY") {
            self.topology_path = Some(PathBuf::from(path));
        }
        if let Some(host) = lookup("VF_LISTEN_HOST") {
            self.channel.host = host;
        }
        if let Some(port) = parse_var(&lookup, "VF_LISTEN_PORT")? {
            self.channel.port = port;
        }
        if let Some(n) = parse_var(&lookup, "VF_MAX_CONNECTIONS")? {
            self.channel.max_connections = n;
        }
        if let Some(n) = parse_var(&lookup, "VF_QUEUE_CAPACITY")? {
            self.channel.queue_capacity = n;
        }
        Ok(self)
    }

    /// Topology path, required before the node can start.
    pub fn topology(&self) -> Result<&Path, ConfigError> {
        self.topology_path
            .as_deref()
            .ok_or(ConfigError::MissingTopology)
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
    }
}
