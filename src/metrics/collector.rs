// src/metrics/collector.rs
use crate::health::{CheckResult, StatusSummary};
use anyhow::Result;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;
use std::time::Duration;

pub struct MetricsRegistry {
    registry: Registry,
    collector: Arc<MetricsCollector>,
}

impl MetricsRegistry {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();
        let collector = Arc::new(MetricsCollector::new(&registry)?);

        Ok(Self {
            registry,
            collector,
        })
    }

    pub fn collector(&self) -> Arc<MetricsCollector> {
        self.collector.clone()
    }

    pub fn gather(&self) -> Result<Vec<u8>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(buffer)
    }
}

pub struct MetricsCollector {
    pub checks_total: IntCounterVec,
    pub check_failures_total: IntCounterVec,
    pub check_duration_seconds: HistogramVec,
    pub node_up: IntGaugeVec,
    pub nodes_healthy: IntGauge,
    pub nodes_total: IntGauge,
}

impl MetricsCollector {
    pub fn new(registry: &Registry) -> Result<Self> {
        let checks_total = IntCounterVec::new(
            Opts::new("greenwall_checks_total", "Total number of check runs"),
            &["group", "node", "type"],
        )?;
        registry.register(Box::new(checks_total.clone()))?;

        let check_failures_total = IntCounterVec::new(
            Opts::new(
                "greenwall_check_failures_total",
                "Total number of failed check runs",
            ),
            &["group", "node", "type"],
        )?;
        registry.register(Box::new(check_failures_total.clone()))?;

        let check_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "greenwall_check_duration_seconds",
                "Check run duration in seconds",
            ),
            &["type"],
        )?;
        registry.register(Box::new(check_duration_seconds.clone()))?;

        let node_up = IntGaugeVec::new(
            Opts::new("greenwall_node_up", "Node status (1 = success, 0 = otherwise)"),
            &["group", "node"],
        )?;
        registry.register(Box::new(node_up.clone()))?;

        let nodes_healthy = IntGauge::new("greenwall_nodes_healthy", "Number of healthy nodes")?;
        registry.register(Box::new(nodes_healthy.clone()))?;

        let nodes_total = IntGauge::new("greenwall_nodes_total", "Number of monitored nodes")?;
        registry.register(Box::new(nodes_total.clone()))?;

        Ok(Self {
            checks_total,
            check_failures_total,
            check_duration_seconds,
            node_up,
            nodes_healthy,
            nodes_total,
        })
    }

    pub fn record_check(
        &self,
        group: &str,
        node: &str,
        check_type: &str,
        result: &CheckResult,
        duration: Duration,
    ) {
        self.checks_total
            .with_label_values(&[group, node, check_type])
            .inc();
        self.check_duration_seconds
            .with_label_values(&[check_type])
            .observe(duration.as_secs_f64());

        if !result.is_success() {
            self.check_failures_total
                .with_label_values(&[group, node, check_type])
                .inc();
        }

        self.node_up
            .with_label_values(&[group, node])
            .set(if result.is_success() { 1 } else { 0 });
    }

    pub fn update_node_counts(&self, summary: StatusSummary) {
        self.nodes_healthy.set(summary.healthy as i64);
        self.nodes_total.set(summary.total as i64);
    }
}
