//! Dual-Pane Backend
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: In-memory catalog, selection and add queue
//! - batching: Timers that drain the add queue and commit selection updates
//! - api: HTTP handlers

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

pub mod api;
pub mod batching;
pub mod config;
pub mod domain;
pub mod repository;

use api::AppState;
use batching::BatchScheduler;
use config::ServerConfig;
use repository::MemoryStore;

/// Parse configuration from the command line and environment, then serve
pub async fn run() -> Result<()> {
    serve(ServerConfig::parse()).await
}

/// Serve until SIGINT or SIGTERM
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let mut logger = rolling_logger::LoggerConfig::new("dual-pane");
    if let Some(dir) = &config.log_dir {
        logger = logger.with_log_dir(dir);
    }
    rolling_logger::init(&logger).context("failed to init logger")?;

    let store = Arc::new(MemoryStore::new(config.total_items)?);
    let scheduler = BatchScheduler::new(store.clone(), config.intervals());
    scheduler.start();

    let app = api::router(AppState::new(store), config.frontend_dist.as_deref());
    match &config.frontend_dist {
        Some(dir) => info!("Serving frontend from {}", dir.display()),
        None => warn!("No frontend bundle configured, serving API only"),
    }

    let (host, port) = config.bind_addr();
    let listener = match TcpListener::bind((host, port)).await {
        Ok(listener) => listener,
        Err(e) => {
            scheduler.stop().await;
            return Err(e).with_context(|| format!("failed to bind {}:{}", host, port));
        }
    };
    info!("Server is running on {}", listener.local_addr()?);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.stop().await;
    served.context("server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for SIGINT: {}", e);
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
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received, shutting down gracefully..."),
        _ = terminate => info!("SIGTERM received, shutting down gracefully..."),
    }
}
