//! # dirhub-database
//!
//! PostgreSQL connection management, migrations, and the folder/file
//! repositories, plus in-memory repositories implementing the same store
//! traits for development and tests.

pub mod connection;
mod error;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use memory::MemoryDatabase;
pub use repositories::{FileRepository, FileStore, FolderRepository, FolderStore};
pub use stores::MetadataStores;
