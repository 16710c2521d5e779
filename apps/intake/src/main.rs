mod config;
mod db;
mod errors;
mod intake;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::intake::storage::{ResumeStorage, UploadPolicy};
use crate::intake::store::PgRecordStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fellowship intake v{}", env!("CARGO_PKG_VERSION"));

    let policy = UploadPolicy::new(&config.allowed_resume_types, config.max_resume_bytes)
        .context("ALLOWED_RESUME_TYPES is invalid")?;
    info!(
        "Accepting resumes: {:?} up to {} bytes",
        config.allowed_resume_types, policy.max_bytes
    );

    let storage = ResumeStorage::new(&config.upload_dir);
    storage.ensure_root().await.with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    info!("Saving resumes to {}", config.upload_dir.display());

    // Initialize PostgreSQL and bring the schema up to date
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    let store = PgRecordStore::new(pool);
    store.init().await?;

    let state = AppState {
        store: Arc::new(store.clone()),
        storage,
        policy,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
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
