// src/health/result.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message carried by every successful check.
pub const MESSAGE_OK: &str = "OK";

/// Message of a check whose response body lacked the expected pattern.
pub const MESSAGE_PATTERN_NOT_FOUND: &str = "pattern not found";

/// Message of a node that has not been checked yet.
pub const MESSAGE_PENDING: &str = "Pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Warning,
    Danger,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Success => "success",
            CheckStatus::Warning => "warning",
            CheckStatus::Danger => "danger",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn success() -> Self {
        Self {
            status: CheckStatus::Success,
            message: MESSAGE_OK.to_string(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Danger,
            message: message.into(),
        }
    }

    pub fn pending() -> Self {
        Self {
            status: CheckStatus::Warning,
            message: MESSAGE_PENDING.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }
}
