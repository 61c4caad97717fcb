//! Unified application error types for DirHub.
//!
//! Every store, gateway, and service maps its failures into [`AppError`] so
//! that callers see one classified error regardless of which collaborator
//! produced it. Mapping a kind to a transport status is left to the HTTP layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// A required field was missing or malformed.
    Validation,
    /// The referenced parent folder does not exist.
    InvalidParent,
    /// The requested folder or file does not exist.
    NotFound,
    /// A duplicate key was detected by the backing store.
    Conflict,
    /// The object store could not be reached or is failing.
    Unavailable,
    /// The object store rejected the service's credentials.
    Unauthorized,
    /// Anything else, including decode failures.
    Internal,
    /// The application configuration is invalid.
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidParent => write!(f, "INVALID_PARENT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The step of a two-store creation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateStep {
    /// Looking up the parent folder in the metadata store.
    ParentLookup,
    /// Writing the marker or issuing the presigned upload.
    ObjectStore,
    /// Persisting the metadata row.
    Metadata,
}

impl fmt::Display for CreateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentLookup => write!(f, "parent_lookup"),
            Self::ObjectStore => write!(f, "object_store"),
            Self::Metadata => write!(f, "metadata"),
        }
    }
}

/// The unified application error used throughout DirHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Which creation step failed, when the error came out of a two-step create.
    pub step: Option<CreateStep>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            step: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            step: None,
            source: Some(Box::new(source)),
        }
    }

    /// Tag the error with the creation step that produced it.
    ///
    /// An existing tag is kept, so the innermost step wins.
    pub fn at_step(mut self, step: CreateStep) -> Self {
        self.step.get_or_insert(step);
        self
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-parent error.
    pub fn invalid_parent(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParent, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    /// Create an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            step: self.step,
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Internal,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_code() {
        let err = AppError::invalid_parent("Parent folder not found");
        assert_eq!(err.to_string(), "INVALID_PARENT: Parent folder not found");
    }

    #[test]
    fn test_innermost_step_wins() {
        let err = AppError::internal("boom")
            .at_step(CreateStep::Metadata)
            .at_step(CreateStep::ObjectStore);
        assert_eq!(err.step, Some(CreateStep::Metadata));
    }

    #[test]
    fn test_clone_drops_source_keeps_step() {
        let io = std::io::Error::other("disk");
        let err = AppError::with_source(ErrorKind::Internal, "wrapped", io)
            .at_step(CreateStep::Metadata);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.step, Some(CreateStep::Metadata));
        assert!(cloned.is(ErrorKind::Internal));
    }
}
