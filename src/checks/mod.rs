// src/checks/mod.rs
mod http;
mod registry;

pub use http::{HttpCheck, HttpCheckError, HTTP_CHECK_NAME, MESSAGE_NOT_INITIALIZED};
pub use registry::{CheckFactory, CheckRegistry, CheckRegistryBuilder, RegistryError};

use crate::config::{MonitoringConfig, NodeConfig};
use crate::health::CheckResult;
use async_trait::async_trait;

/// A probe type that can be resolved by name from a [`CheckRegistry`].
///
/// Instances start zero-valued, are configured once through `initialize`
/// and are then run repeatedly by the monitor. `run` must turn every
/// failure into a `Danger` result and must return within the timeout
/// configured at `initialize` time.
#[async_trait]
pub trait Check: Send + Sync {
    /// Registered type name of this check.
    fn name(&self) -> &'static str;

    /// Configure the instance. Must not perform I/O and must not fail;
    /// missing optional parameters disable the matching feature.
    fn initialize(&mut self, monitoring: &MonitoringConfig, node: &NodeConfig);

    /// Perform a single probe attempt.
    async fn run(&self) -> CheckResult;
}
