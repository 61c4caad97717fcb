//! Metadata store traits and their PostgreSQL implementations.

pub mod file;
pub mod folder;

pub use file::{FileRepository, FileStore};
pub use folder::{FolderRepository, FolderStore};
