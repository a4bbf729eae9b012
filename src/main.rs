// src/main.rs
use anyhow::Result;
use greenwall::{
    checks::CheckRegistry,
    config,
    metrics::MetricsRegistry,
    monitor::Monitor,
    server::{self, StatusHandler},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greenwall=info".parse()?)
                .add_directive("hyper=info".parse()?),
        )
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    info!("Loading configuration from: {}", config_path);
    let config = config::load_config(&config_path).await?;

    let registry = CheckRegistry::with_builtin_checks()?;
    info!("Available check types: {}", registry.type_names().join(", "));

    let metrics_registry = Arc::new(MetricsRegistry::new()?);

    let monitor = Arc::new(Monitor::from_config(
        &config,
        &registry,
        Some(metrics_registry.collector()),
    )?);
    let checker = tokio::spawn(monitor.clone().start());

    if config.server.enabled {
        let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();
        let handler = StatusHandler::new(monitor.clone(), Some(metrics_registry));
        server::serve(addr, handler, shutdown_signal()).await?;
    } else {
        shutdown_signal().await;
    }

    monitor.shutdown();
    checker.await?;

    info!("Shutdown complete");
    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
