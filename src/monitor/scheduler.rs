// src/monitor/scheduler.rs
use crate::checks::{Check, CheckRegistry, RegistryError};
use crate::config::Configuration;
use crate::health::{CheckResult, HealthStatus};
use crate::metrics::MetricsCollector;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("node '{node}' in group '{group}': {source}")]
    Node {
        group: String,
        node: String,
        #[source]
        source: RegistryError,
    },
}

struct MonitoredNode {
    group: usize,
    index: usize,
    group_name: String,
    name: String,
    check: Arc<dyn Check>,
}

/// Runs every configured check on a fixed interval and publishes the
/// resulting [`HealthStatus`].
pub struct Monitor {
    check_interval: Duration,
    nodes: Vec<MonitoredNode>,
    status: ArcSwap<HealthStatus>,
    // Held for a whole cycle so overlapping cycles cannot drop each other's results.
    cycle: tokio::sync::Mutex<()>,
    metrics: Option<Arc<MetricsCollector>>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl Monitor {
    /// Resolve and initialize one check per configured node.
    ///
    /// Fails on the first node whose type has no registration.
    pub fn from_config(
        config: &Configuration,
        registry: &CheckRegistry,
        metrics: Option<Arc<MetricsCollector>>,
    ) -> Result<Self, MonitorError> {
        let mut nodes = Vec::new();

        for (group_index, group) in config.groups.iter().enumerate() {
            for (index, node) in group.nodes.iter().enumerate() {
                let mut check =
                    registry
                        .create(&node.check_type)
                        .map_err(|source| MonitorError::Node {
                            group: group.name.clone(),
                            node: node.name.clone(),
                            source,
                        })?;
                check.initialize(&config.general, node);

                debug!(
                    "Initialized {} for node {} ({})",
                    check.name(),
                    node.name,
                    node.endpoint
                );

                nodes.push(MonitoredNode {
                    group: group_index,
                    index,
                    group_name: group.name.clone(),
                    name: node.name.clone(),
                    check: Arc::from(check),
                });
            }
        }

        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Ok(Self {
            check_interval: config.general.check_interval(),
            nodes,
            status: ArcSwap::from_pointee(HealthStatus::from_config(config)),
            cycle: tokio::sync::Mutex::new(()),
            metrics,
            shutdown_tx,
            shutdown_rx,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Latest published status.
    pub fn snapshot(&self) -> Arc<HealthStatus> {
        self.status.load_full()
    }

    pub async fn start(self: Arc<Self>) {
        let mut interval = interval(self.check_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut shutdown_rx = self.shutdown_rx.clone();

        info!(
            "Starting monitor for {} nodes with interval: {:?}",
            self.nodes.len(),
            self.check_interval
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.check_all_nodes().await;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Monitor shutting down");
                        break;
                    }
                }
            }
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Run every check once, concurrently, and publish the folded results.
    ///
    /// Overlapping calls are serialized: each cycle folds into the status
    /// published by the previous one.
    pub async fn check_all_nodes(&self) -> Arc<HealthStatus> {
        let _cycle = self.cycle.lock().await;

        let tasks = self.nodes.iter().map(|node| {
            let check = node.check.clone();
            tokio::spawn(async move {
                let start = Instant::now();
                let result = check.run().await;
                (result, start.elapsed())
            })
        });

        let results = futures::future::join_all(tasks).await;
        let mut status = (**self.status.load()).clone();

        for (node, joined) in self.nodes.iter().zip(results) {
            let (result, elapsed) = match joined {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Check task for node {} failed: {}", node.name, e);
                    (
                        CheckResult::danger(format!("check aborted: {}", e)),
                        Duration::ZERO,
                    )
                }
            };

            if result.is_success() {
                debug!("Node {} is healthy", node.name);
            } else {
                warn!("Node {} is unhealthy: {}", node.name, result.message);
            }

            if let Some(metrics) = &self.metrics {
                metrics.record_check(
                    &node.group_name,
                    &node.name,
                    node.check.name(),
                    &result,
                    elapsed,
                );
            }

            if let Some(target) = status.node_mut(node.group, node.index) {
                target.apply(result);
            }
        }

        let summary = status.summary();
        if let Some(metrics) = &self.metrics {
            metrics.update_node_counts(summary);
        }

        info!(
            "Check cycle complete: {}/{} nodes healthy",
            summary.healthy, summary.total
        );

        let status = Arc::new(status);
        self.status.store(status.clone());
        status
    }
}
