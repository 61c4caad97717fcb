//! Custom Axum extractors.

pub mod json;
pub mod path;
pub mod query;

pub use json::ValidatedJson;
pub use path::{parse_file_id, parse_folder_id};
pub use query::ValidatedQuery;
