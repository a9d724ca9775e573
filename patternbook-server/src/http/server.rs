//! Axum setup and router configuration
//!
//! The API router listens on the main bind address; a second, minimal
//! router serves the uploads directory on its own address so image
//! links stay independent of the JSON API.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use patternbook_core::ServerConfig;

use crate::http::routes;

/// Uploads are capped well above any plausible pattern photo.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub pool: SqlitePool,
    pub config: ServerConfig,
}

/// Build the API router with all entity routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS open for local development, same as the browser frontends expect
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .merge(routes::patterns::router())
        .merge(routes::materials::router())
        .merge(routes::images::router())
        .merge(routes::stitchbook::router())
        .merge(routes::sequence::router())
        .merge(routes::pages::router())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(middleware)
        .with_state(state)
}

/// Build the asset router: a file server over the uploads directory.
pub fn build_asset_router(config: &ServerConfig) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(&config.uploads_dir))
        .layer(TraceLayer::new_for_http())
}

/// Run both listeners until shutdown.
pub async fn run_server(pool: SqlitePool, config: ServerConfig) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let asset_app = build_asset_router(&config);
    let asset_listener = TcpListener::bind(config.asset_addr).await?;
    info!(
        "Serving uploads from {} on http://{}",
        config.uploads_dir.display(),
        config.asset_addr
    );

    let api_addr = config.bind_addr;
    let state = Arc::new(AppState { pool, config });
    let app = build_router(state);

    let listener = TcpListener::bind(api_addr).await?;
    info!("Starting patternbook API on http://{}", api_addr);

    let assets = tokio::spawn(async move {
        axum::serve(asset_listener, asset_app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    assets.await??;
    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
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
