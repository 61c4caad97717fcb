//! Core type definitions used across the DirHub workspace.

pub mod id;

pub use id::*;
