//! # dirhub-service
//!
//! Orchestration services for DirHub. Each create is a two-step write:
//! the object store first, then the metadata store, with the marker
//! removed again if the metadata write fails.
//!
//! Services follow constructor injection: the stores and the gateway are
//! handed in as `Arc` trait objects.

pub mod file;
pub mod folder;

pub use file::{CreateFileRequest, FileService, ReconcileReport, UploadPolicy};
pub use folder::FolderService;
