//! execdash -- test-execution dashboard.
//!
//! This crate provides the execution repository and its HTTP API, the
//! retrieval client, aggregation and selection state, display descriptors and
//! single-execution export.

pub mod aggregate;
pub mod api;
pub mod client;
pub mod config;
pub mod export;
pub mod model;
pub mod present;
pub mod selection;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::state::AppState;
use crate::config::ExecdashConfig;
use crate::storage::SqliteExecutionRepository;

/// Start the execdash API server and run until it stops.
pub async fn serve(config: &ExecdashConfig) -> Result<()> {
    // 1. Initialize Storage
    tracing::info!(db_path = %config.database.path.display(), "Initializing database");
    let pool = storage::open_pool(&config.database)?;
    let repo = Arc::new(SqliteExecutionRepository::new(pool));

    // 2. Start API Server
    let addr: std::net::SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.server.bind))?;
    let app = api::router(AppState::new(repo), &config.server)?;

    tracing::info!(%addr, origin = %config.server.allowed_origin, "execdash listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
