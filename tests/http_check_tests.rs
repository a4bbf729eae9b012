// tests/http_check_tests.rs
use greenwall::checks::{Check, CheckRegistry};
use greenwall::config::{MonitoringConfig, NodeConfig};
use greenwall::health::{CheckResult, CheckStatus};
use mockito::Matcher;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn monitoring(timeout_ms: u64) -> MonitoringConfig {
    MonitoringConfig {
        http_client_timeout_ms: timeout_ms,
        ..MonitoringConfig::default()
    }
}

fn node(endpoint: &str, parameters: &[(&str, &str)], expected_pattern: &str) -> NodeConfig {
    NodeConfig {
        name: "service".into(),
        check_type: "http_check".into(),
        endpoint: endpoint.into(),
        expected_pattern: expected_pattern.into(),
        parameters: parameters
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    }
}

fn http_check(config: &NodeConfig, timeout_ms: u64) -> Box<dyn Check> {
    let registry = CheckRegistry::with_builtin_checks().unwrap();
    let mut check = registry.create("http_check").unwrap();
    check.initialize(&monitoring(timeout_ms), config);
    check
}

async fn run(config: &NodeConfig) -> CheckResult {
    http_check(config, 2000).run().await
}

#[tokio::test]
async fn test_pattern_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("service is healthy")
        .create_async()
        .await;

    let endpoint = format!("{}/health", server.url());
    let result = run(&node(&endpoint, &[("expectedPattern", "healthy")], "")).await;

    assert_eq!(result, CheckResult::success());
    assert_eq!(result.message, "OK");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_pattern_not_found() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("down")
        .create_async()
        .await;

    let endpoint = format!("{}/health", server.url());
    let result = run(&node(&endpoint, &[("expectedPattern", "healthy")], "")).await;

    assert_eq!(result.status, CheckStatus::Danger);
    assert_eq!(result.message, "pattern not found");
}

#[tokio::test]
async fn test_no_pattern_accepts_any_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body("anything at all")
        .create_async()
        .await;

    let result = run(&node(&server.url(), &[], "")).await;
    assert_eq!(result, CheckResult::success());
}

#[tokio::test]
async fn test_error_status_reports_reason_phrase() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/health")
        .with_status(503)
        .with_body("healthy")
        .create_async()
        .await;

    let endpoint = format!("{}/health", server.url());
    let result = run(&node(&endpoint, &[("expectedPattern", "healthy")], "")).await;

    assert_eq!(result.status, CheckStatus::Danger);
    assert_eq!(result.message, "503 - Service Unavailable");
}

#[tokio::test]
async fn test_client_error_status_is_danger() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let endpoint = format!("{}/missing", server.url());
    let result = run(&node(&endpoint, &[], "")).await;

    assert_eq!(result, CheckResult::danger("404 - Not Found"));
}

#[tokio::test]
async fn test_non_error_status_without_body_is_success() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(204)
        .create_async()
        .await;

    let result = run(&node(&server.url(), &[], "")).await;
    assert_eq!(result.status, CheckStatus::Success);
}

#[tokio::test]
async fn test_parameter_pattern_takes_precedence() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .with_status(200)
        .with_body("legacy build")
        .create_async()
        .await;

    let both = node(&server.url(), &[("expectedPattern", "modern")], "legacy");
    assert_eq!(run(&both).await.message, "pattern not found");

    let deprecated_only = node(&server.url(), &[], "legacy");
    assert_eq!(run(&deprecated_only).await, CheckResult::success());
}

#[tokio::test]
async fn test_basic_auth_attached_when_configured() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/private")
        // base64("user:pass")
        .match_header("authorization", "Basic dXNlcjpwYXNz")
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let endpoint = format!("{}/private", server.url());
    let config = node(
        &endpoint,
        &[("basicAuthUsername", "user"), ("basicAuthPassword", "pass")],
        "",
    );

    assert_eq!(run(&config).await, CheckResult::success());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_basic_auth_omitted_when_incomplete() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/private")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body("ok")
        .expect(2)
        .create_async()
        .await;

    let endpoint = format!("{}/private", server.url());

    let no_password = node(&endpoint, &[("basicAuthUsername", "user")], "");
    assert_eq!(run(&no_password).await, CheckResult::success());

    let empty_username = node(
        &endpoint,
        &[("basicAuthUsername", ""), ("basicAuthPassword", "pass")],
        "",
    );
    assert_eq!(run(&empty_username).await, CheckResult::success());

    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_danger() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = run(&node(&format!("http://{}/health", addr), &[], "")).await;

    assert_eq!(result.status, CheckStatus::Danger);
    assert!(!result.message.is_empty());
    assert_ne!(result.message, "OK");
}

#[tokio::test]
async fn test_unresponsive_endpoint_times_out() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept connections and never answer.
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    let check = http_check(&node(&format!("http://{}/", addr), &[], ""), 200);

    let start = Instant::now();
    let result = check.run().await;

    assert_eq!(result.status, CheckStatus::Danger);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_truncated_body_is_danger() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promise 100 bytes, send 5, then hang up.
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nshort")
                .await;
            let _ = stream.shutdown().await;
        }
    });

    let config = node(&format!("http://{}/", addr), &[("expectedPattern", "short")], "");
    let result = run(&config).await;

    assert_eq!(result.status, CheckStatus::Danger);
    assert_ne!(result.message, "pattern not found");
    assert_ne!(result.message, "OK");
}

#[tokio::test]
async fn test_repeated_runs_are_independent() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .with_status(200)
        .with_body("healthy")
        .expect(3)
        .create_async()
        .await;

    let check = http_check(&node(&server.url(), &[("expectedPattern", "healthy")], ""), 2000);
    for _ in 0..3 {
        assert_eq!(check.run().await, CheckResult::success());
    }

    mock.assert_async().await;
}
