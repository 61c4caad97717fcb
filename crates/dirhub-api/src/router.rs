//! Route definitions for the DirHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::request_logging))
        .with_state(state)
}

/// Folder creation and queries
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route("/folders/{id}", get(handlers::folder::get_folder))
        .route("/folders/{id}/children", get(handlers::folder::list_children))
        .route("/folders/{id}/files", get(handlers::folder::list_files))
}

/// File registration and upload tracking
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", post(handlers::file::create_file))
        .route("/files/reconcile", post(handlers::file::reconcile))
        .route("/files/{id}", get(handlers::file::get_file))
        .route("/files/{id}/confirm", post(handlers::file::confirm_upload))
        .route("/files/{id}/download", get(handlers::file::download_file))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
