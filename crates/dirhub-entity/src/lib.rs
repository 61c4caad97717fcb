//! # dirhub-entity
//!
//! Domain entity models for DirHub. Every struct in this crate represents a
//! metadata table row. All entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and `sqlx::FromRow`.

pub mod file;
pub mod folder;
