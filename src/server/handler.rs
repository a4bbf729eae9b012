// src/server/handler.rs
use crate::metrics::MetricsRegistry;
use crate::monitor::Monitor;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::sync::Arc;
use tracing::error;

const JSON: &str = "application/json";
const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";
const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Serves the latest status snapshot and metrics.
#[derive(Clone)]
pub struct StatusHandler {
    monitor: Arc<Monitor>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl StatusHandler {
    pub fn new(monitor: Arc<Monitor>, metrics: Option<Arc<MetricsRegistry>>) -> Self {
        Self { monitor, metrics }
    }

    pub fn handle(&self, req: &Request<Body>) -> Response<Body> {
        if req.method() != Method::GET {
            return respond(StatusCode::METHOD_NOT_ALLOWED, PLAIN_TEXT, "Method Not Allowed");
        }

        match req.uri().path() {
            "/status" => self.status(),
            "/metrics" => self.metrics(),
            "/healthz" => respond(StatusCode::OK, PLAIN_TEXT, "OK"),
            _ => respond(StatusCode::NOT_FOUND, PLAIN_TEXT, "Not Found"),
        }
    }

    fn status(&self) -> Response<Body> {
        let snapshot = self.monitor.snapshot();
        match serde_json::to_vec(snapshot.as_ref()) {
            Ok(body) => respond(StatusCode::OK, JSON, body),
            Err(e) => {
                error!("Failed to serialize status: {}", e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PLAIN_TEXT,
                    "Internal Server Error",
                )
            }
        }
    }

    fn metrics(&self) -> Response<Body> {
        let Some(registry) = &self.metrics else {
            return respond(StatusCode::NOT_FOUND, PLAIN_TEXT, "Not Found");
        };

        match registry.gather() {
            Ok(body) => respond(StatusCode::OK, PROMETHEUS_TEXT, body),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                respond(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PLAIN_TEXT,
                    "Internal Server Error",
                )
            }
        }
    }
}

fn respond(status: StatusCode, content_type: &'static str, body: impl Into<Body>) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}
