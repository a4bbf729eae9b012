// src/checks/http.rs
use super::{Check, CheckRegistryBuilder, RegistryError};
use crate::config::{MonitoringConfig, NodeConfig};
use crate::health::{CheckResult, MESSAGE_PATTERN_NOT_FOUND};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, warn};

pub const HTTP_CHECK_NAME: &str = "http_check";

/// Message of a check that is run before `initialize`.
pub const MESSAGE_NOT_INITIALIZED: &str = "check not initialized";

const EXPECTED_PATTERN_PARAMETER: &str = "expectedPattern";
const BASIC_AUTH_USERNAME_PARAMETER: &str = "basicAuthUsername";
const BASIC_AUTH_PASSWORD_PARAMETER: &str = "basicAuthPassword";

#[derive(Debug, thiserror::Error)]
pub enum HttpCheckError {
    #[error("{0}")]
    Request(#[source] reqwest::Error),

    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("{} - {}", .0.as_u16(), .0.canonical_reason().unwrap_or(""))]
    Status(StatusCode),

    #[error("{0}")]
    Body(#[source] reqwest::Error),

    #[error("{}", MESSAGE_PATTERN_NOT_FOUND)]
    PatternNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct BasicAuth {
    username: String,
    password: String,
}

/// Issues a GET against the node endpoint, optionally authenticated, and
/// optionally requires a byte pattern in the response body.
#[derive(Debug, Default)]
pub struct HttpCheck {
    client: Option<Client>,
    endpoint: String,
    pattern: Vec<u8>,
    basic_auth: Option<BasicAuth>,
}

impl HttpCheck {
    pub fn register(registry: &mut CheckRegistryBuilder) -> Result<(), RegistryError> {
        registry.register_type(HTTP_CHECK_NAME, HttpCheck::create)?;
        Ok(())
    }

    fn create() -> Box<dyn Check> {
        Box::new(HttpCheck::default())
    }

    async fn probe(&self, client: &Client) -> Result<(), HttpCheckError> {
        let mut request = client.get(self.endpoint.as_str());
        if let Some(auth) = &self.basic_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        let request = request.build().map_err(HttpCheckError::Request)?;

        let response = client
            .execute(request)
            .await
            .map_err(HttpCheckError::Transport)?;

        let status = response.status();
        if is_http_error(status) {
            return Err(HttpCheckError::Status(status));
        }

        // The body is released as part of reading it.
        let body = response.bytes().await.map_err(HttpCheckError::Body)?;

        if !self.pattern.is_empty() && !contains(&body, &self.pattern) {
            return Err(HttpCheckError::PatternNotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl Check for HttpCheck {
    fn name(&self) -> &'static str {
        HTTP_CHECK_NAME
    }

    fn initialize(&mut self, monitoring: &MonitoringConfig, node: &NodeConfig) {
        self.endpoint = node.endpoint.clone();

        self.client = match Client::builder()
            .timeout(monitoring.http_client_timeout())
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                error!("Failed to create HTTP client for {}: {}", node.name, e);
                None
            }
        };

        // The `expectedPattern` field is deprecated; the parameter takes precedence.
        self.pattern = node
            .parameter(EXPECTED_PATTERN_PARAMETER)
            .unwrap_or(node.expected_pattern.as_str())
            .as_bytes()
            .to_vec();

        self.basic_auth = match (
            node.parameter(BASIC_AUTH_USERNAME_PARAMETER),
            node.parameter(BASIC_AUTH_PASSWORD_PARAMETER),
        ) {
            (Some(username), Some(password)) => Some(BasicAuth {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => None,
        };
    }

    async fn run(&self) -> CheckResult {
        let Some(client) = &self.client else {
            return CheckResult::danger(MESSAGE_NOT_INITIALIZED);
        };

        match self.probe(client).await {
            Ok(()) => {
                debug!("HTTP check of {} succeeded", self.endpoint);
                CheckResult::success()
            }
            Err(e) => {
                warn!("HTTP check of {} failed: {}", self.endpoint, e);
                CheckResult::danger(e.to_string())
            }
        }
    }
}

fn is_http_error(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::CheckStatus;
    use std::collections::HashMap;

    fn node(parameters: &[(&str, &str)], expected_pattern: &str) -> NodeConfig {
        NodeConfig {
            name: "api".into(),
            check_type: HTTP_CHECK_NAME.into(),
            endpoint: "http://127.0.0.1:1/health".into(),
            expected_pattern: expected_pattern.into(),
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    fn initialized(node: &NodeConfig) -> HttpCheck {
        let mut check = HttpCheck::default();
        check.initialize(&MonitoringConfig::default(), node);
        check
    }

    #[test]
    fn test_pattern_parameter_wins_over_deprecated_field() {
        let check = initialized(&node(&[("expectedPattern", "modern")], "legacy"));
        assert_eq!(check.pattern, b"modern");
    }

    #[test]
    fn test_deprecated_pattern_used_as_fallback() {
        let check = initialized(&node(&[], "legacy"));
        assert_eq!(check.pattern, b"legacy");

        let check = initialized(&node(&[("expectedPattern", "")], "legacy"));
        assert_eq!(check.pattern, b"legacy");
    }

    #[test]
    fn test_no_pattern_configured() {
        let check = initialized(&node(&[], ""));
        assert!(check.pattern.is_empty());
    }

    #[test]
    fn test_basic_auth_requires_both_fields() {
        let both = node(
            &[("basicAuthUsername", "user"), ("basicAuthPassword", "pass")],
            "",
        );
        assert_eq!(
            initialized(&both).basic_auth,
            Some(BasicAuth {
                username: "user".into(),
                password: "pass".into(),
            })
        );

        let no_password = node(
            &[("basicAuthUsername", "user"), ("basicAuthPassword", "")],
            "",
        );
        assert!(initialized(&no_password).basic_auth.is_none());

        let no_username = node(&[("basicAuthPassword", "pass")], "");
        assert!(initialized(&no_username).basic_auth.is_none());
    }

    #[test]
    fn test_initialize_keeps_unknown_parameters_harmless() {
        let check = initialized(&node(&[("followRedirects", "maybe")], ""));
        assert!(check.client.is_some());
        assert!(check.basic_auth.is_none());
    }

    #[test]
    fn test_contains() {
        assert!(contains(b"service is healthy", b"healthy"));
        assert!(!contains(b"down", b"healthy"));
        assert!(!contains(b"", b"x"));
        assert!(contains(b"anything", b""));
        assert!(contains(b"", b""));
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(
            HttpCheckError::Status(StatusCode::SERVICE_UNAVAILABLE).to_string(),
            "503 - Service Unavailable"
        );
        assert_eq!(
            HttpCheckError::Status(StatusCode::NOT_FOUND).to_string(),
            "404 - Not Found"
        );
        assert_eq!(HttpCheckError::PatternNotFound.to_string(), "pattern not found");
    }

    #[test]
    fn test_http_error_boundary() {
        assert!(!is_http_error(StatusCode::OK));
        assert!(!is_http_error(StatusCode::PERMANENT_REDIRECT));
        assert!(is_http_error(StatusCode::BAD_REQUEST));
        assert!(is_http_error(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_run_before_initialize() {
        let check = HttpCheck::default();
        let result = check.run().await;
        assert_eq!(result.status, CheckStatus::Danger);
        assert_eq!(result.message, MESSAGE_NOT_INITIALIZED);
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_danger() {
        let mut config = node(&[], "");
        config.endpoint = "not a url".into();
        let check = initialized(&config);

        let result = check.run().await;
        assert_eq!(result.status, CheckStatus::Danger);
        assert!(!result.message.is_empty());
    }
}
