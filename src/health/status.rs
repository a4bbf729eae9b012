// src/health/status.rs
use super::result::{CheckResult, CheckStatus};
use crate::config::{Configuration, NodeConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Health statuses of every monitored node, grouped for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub groups: Vec<Group>,
}

/// A named, ordered collection of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub anchor: String,
    pub nodes: Vec<Node>,
}

/// Latest known state of one monitored node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    #[serde(rename = "type")]
    pub check_type: String,
    pub endpoint: String,
    pub http_endpoint: bool,
    pub status: CheckStatus,
    pub message: String,
    pub last_checked: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSummary {
    pub healthy: usize,
    pub total: usize,
}

impl HealthStatus {
    /// Build the initial tree with every node pending, in configuration order.
    pub fn from_config(config: &Configuration) -> Self {
        let groups = config
            .groups
            .iter()
            .map(|group| {
                let mut g = Group::new(&group.name);
                g.nodes = group.nodes.iter().map(Node::pending).collect();
                g
            })
            .collect();

        Self { groups }
    }

    pub fn node_mut(&mut self, group: usize, node: usize) -> Option<&mut Node> {
        self.groups.get_mut(group)?.nodes.get_mut(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&Group, &Node)> {
        self.groups
            .iter()
            .flat_map(|group| group.nodes.iter().map(move |node| (group, node)))
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary { healthy: 0, total: 0 };
        for (_, node) in self.nodes() {
            summary.total += 1;
            if node.status == CheckStatus::Success {
                summary.healthy += 1;
            }
        }
        summary
    }
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            anchor: anchor_for(name),
            nodes: Vec::new(),
        }
    }
}

impl Node {
    pub fn pending(config: &NodeConfig) -> Self {
        let pending = CheckResult::pending();
        Self {
            name: config.name.clone(),
            check_type: config.check_type.clone(),
            endpoint: config.endpoint.clone(),
            http_endpoint: is_http_endpoint(&config.endpoint),
            status: pending.status,
            message: pending.message,
            last_checked: None,
        }
    }

    /// Replace the node's state with the outcome of its latest run.
    pub fn apply(&mut self, result: CheckResult) {
        self.status = result.status;
        self.message = result.message;
        self.last_checked = Some(Utc::now());
    }
}

fn is_http_endpoint(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}

// "Core Services / EU" -> "core-services-eu"
fn anchor_for(name: &str) -> String {
    let mut anchor = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    anchor
}
