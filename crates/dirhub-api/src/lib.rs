//! # dirhub-api
//!
//! HTTP API layer for DirHub built on Axum.
//!
//! A thin surface over the folder and file services: routes, request
//! validation, CORS, request logging, and the mapping from error kinds to
//! HTTP statuses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
