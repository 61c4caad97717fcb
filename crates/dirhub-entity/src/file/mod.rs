//! File domain entities.

pub mod model;
pub mod status;

pub use model::File;
pub use status::UploadStatus;
