//! Folder creation and queries.

pub mod service;

pub use service::FolderService;
