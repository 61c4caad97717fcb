//! Application builder: wires router, middleware, and state into an Axum app.

use axum::Router;
use tower_http::trace::TraceLayer;

use dirhub_core::config::AppConfig;
use dirhub_core::error::AppError;
use dirhub_database::MetadataStores;
use dirhub_storage::build_object_store;

use crate::middleware::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the DirHub server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DirHub server...");

    let stores = MetadataStores::connect(&config.database).await?;
    let objects = build_object_store(&config.storage).await?;
    tracing::info!(
        provider = objects.provider_type(),
        bucket = %config.storage.bucket,
        "Object store ready"
    );

    let addr = config.server.bind_addr();
    let state = AppState::new(config, stores.clone(), objects);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DirHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(pool) = &stores.pool {
        pool.close().await;
    }
    tracing::info!("DirHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
