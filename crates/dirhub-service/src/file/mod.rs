//! File registration, upload confirmation, and reconciliation.

pub mod reconcile;
pub mod service;

pub use reconcile::ReconcileReport;
pub use service::{CreateFileRequest, FileService, UploadPolicy};
