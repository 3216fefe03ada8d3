//! Server bootstrap: storage, metrics, router, graceful shutdown.

use std::sync::Arc;

use anyhow::Context;

use crate::api::{self, AppState};
use crate::config::AppConfig;
use crate::metrics;
use crate::storage::Database;

/// Opens storage, runs migrations and serves the API until shutdown.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    metrics::init_metrics().context("metrics initialization failed")?;

    let db = Database::open(&config.database_path)
        .await
        .context("database open failed")?;
    db.run_migrations().await.context("migrations failed")?;

    let bind_addr = config.bind_addr;
    let state = AppState {
        db: Arc::new(db),
        config: Arc::new(config),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(addr = %bind_addr, version = env!("CARGO_PKG_VERSION"), "swaprunn listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
