//! # dirhub-core
//!
//! Core crate for DirHub. Contains the collaborator traits for the metadata
//! and object stores, configuration schemas, typed identifiers, the path
//! derivation rules, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DirHub crates.

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, CreateStep, ErrorKind};
pub use result::AppResult;
