//! Classification of sqlx errors at the store boundary.
//!
//! Decisions are made on the SQLSTATE code reported by the driver, never on
//! the message text.

use dirhub_core::error::{AppError, ErrorKind};

/// `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a SQLSTATE code to an error kind.
pub(crate) fn classify_sqlstate(code: Option<&str>) -> ErrorKind {
    match code {
        Some(UNIQUE_VIOLATION) => ErrorKind::Conflict,
        Some(FOREIGN_KEY_VIOLATION) => ErrorKind::InvalidParent,
        _ => ErrorKind::Internal,
    }
}

/// Convert a sqlx error into an [`AppError`], keeping it as the source.
pub(crate) fn map_sqlx_error(err: sqlx::Error, context: &str) -> AppError {
    let kind = match &err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::Database(db_err) => classify_sqlstate(db_err.code().as_deref()),
        _ => ErrorKind::Internal,
    };

    let message = match (&err, kind) {
        (sqlx::Error::Database(db_err), ErrorKind::Conflict) => match db_err.constraint() {
            Some(constraint) => format!("{context}: duplicate key ({constraint})"),
            None => format!("{context}: duplicate key"),
        },
        (_, ErrorKind::InvalidParent) => format!("{context}: referenced folder does not exist"),
        _ => format!("{context}: {err}"),
    };

    AppError::with_source(kind, message, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_sqlstate() {
        assert_eq!(classify_sqlstate(Some("23505")), ErrorKind::Conflict);
        assert_eq!(classify_sqlstate(Some("23503")), ErrorKind::InvalidParent);
        assert_eq!(classify_sqlstate(Some("22P02")), ErrorKind::Internal);
        assert_eq!(classify_sqlstate(None), ErrorKind::Internal);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound, "Failed to update file");
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.source.is_some());
    }

    #[test]
    fn test_pool_errors_are_internal() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "Failed to find folder");
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(err.message.starts_with("Failed to find folder"));
    }
}
