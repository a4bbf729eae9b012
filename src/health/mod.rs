// src/health/mod.rs
mod result;
mod status;

pub use result::{
    CheckResult, CheckStatus, MESSAGE_OK, MESSAGE_PATTERN_NOT_FOUND, MESSAGE_PENDING,
};
pub use status::{Group, HealthStatus, Node, StatusSummary};
