// src/config/models.rs
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub general: MonitoringConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Settings shared by every check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default = "default_http_client_timeout_ms")]
    pub http_client_timeout_ms: u64,
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

/// Per-node check descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub endpoint: String,
    /// Deprecated: use `parameters.expectedPattern`.
    #[serde(default)]
    pub expected_pattern: String,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            http_client_timeout_ms: default_http_client_timeout_ms(),
            check_interval_secs: default_check_interval_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_server_port(),
        }
    }
}

impl MonitoringConfig {
    pub fn http_client_timeout(&self) -> Duration {
        Duration::from_millis(self.http_client_timeout_ms)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

impl NodeConfig {
    /// Non-empty parameter value, if any.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }
}

impl Configuration {
    pub fn validate(&self) -> Result<()> {
        if self.general.http_client_timeout_ms == 0 {
            bail!("general.http_client_timeout_ms must be greater than zero");
        }
        if self.general.check_interval_secs == 0 {
            bail!("general.check_interval_secs must be greater than zero");
        }

        for group in &self.groups {
            if group.name.trim().is_empty() {
                bail!("group name must not be empty");
            }

            let mut seen = HashSet::new();
            for node in &group.nodes {
                if node.name.trim().is_empty() {
                    bail!("group '{}' has a node without a name", group.name);
                }
                if node.check_type.trim().is_empty() {
                    bail!("node '{}' in group '{}' has no type", node.name, group.name);
                }
                if !seen.insert(node.name.as_str()) {
                    bail!("duplicate node '{}' in group '{}'", node.name, group.name);
                }
            }
        }

        Ok(())
    }
}

fn default_http_client_timeout_ms() -> u64 {
    5000
}

fn default_check_interval_secs() -> u64 {
    30
}

fn default_server_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}
