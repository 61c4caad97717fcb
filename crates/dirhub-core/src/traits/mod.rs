//! Core traits defined in `dirhub-core` and implemented by other crates.

pub mod repository;
pub mod storage;

pub use repository::Repository;
pub use storage::{
    DownloadOptions, FolderMarker, ObjectStat, ObjectStoreGateway, PresignOptions,
    PresignedDownload, PresignedUpload,
};
