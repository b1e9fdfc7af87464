//! Telemetry configuration from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

/// Logging and metrics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to the start-up log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full
    /// `EnvFilter` directive
    pub log_level: String,

    /// Whether to write logs to stdout at all
    pub console_output: bool,

    /// Whether to emit JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "veriflow".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VF_SERVICE_NAME`: Service name (default: veriflow)
    /// - `VF_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `VF_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `VF_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply the environment variables above on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        if let Ok(name) = env::var("VF_SERVICE_NAME") {
            self.service_name = name;
        }
        if let Ok(level) = env::var("VF_LOG_LEVEL").or_else(|_| env::var("RUST_LOG")) {
            self.log_level = level;
        }
        if let Ok(v) = env::var("VF_CONSOLE_OUTPUT") {
            self.console_output = parse_flag(&v, true);
        }
        self.json_logs = match env::var("VF_JSON_LOGS") {
            Ok(v) => parse_flag(&v, false),
            Err(_) => self.json_logs || is_container,
        };
        self
    }
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}
