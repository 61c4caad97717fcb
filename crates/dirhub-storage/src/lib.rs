//! # dirhub-storage
//!
//! Object store gateways for DirHub. Supports S3-compatible endpoints
//! (AWS, MinIO, R2) and a process-local store for development and tests,
//! plus a retry decorator that wraps either.

pub mod manager;
pub mod providers;
pub mod retry;

pub use manager::build_object_store;
pub use providers::memory::MemoryObjectStore;
#[cfg(feature = "s3")]
pub use providers::s3::S3ObjectStore;
pub use retry::RetryingObjectStore;
