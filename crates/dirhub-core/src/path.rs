//! Canonical path derivation for folders and files.
//!
//! Entity paths always start with `/` and never end with one. Object keys
//! are the same path without the leading `/`. Folder markers add a provider
//! suffix that is never part of the stored `full_path`.

use crate::config::MarkerStyle;
use crate::error::AppError;
use crate::result::AppResult;

/// Longest accepted folder or file name, in bytes.
pub const MAX_SEGMENT_LEN: usize = 255;

/// Name of the placeholder object written under the `keep_file` marker style.
pub const KEEP_FILE: &str = ".keep";

/// Derives canonical paths and object-store keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    /// Join a segment onto its parent's path, or onto the root when there is no parent.
    pub fn resolve(parent_full_path: Option<&str>, segment: &str) -> String {
        match parent_full_path {
            Some(parent) => format!("{}/{}", parent.trim_end_matches('/'), segment),
            None => format!("/{segment}"),
        }
    }

    /// The object key addressing an entity path.
    pub fn object_key(full_path: &str) -> String {
        full_path.trim_start_matches('/').to_string()
    }

    /// The key of the marker object that makes a folder listable.
    pub fn marker_key(full_path: &str, style: MarkerStyle) -> String {
        let key = Self::object_key(full_path);
        let key = key.trim_end_matches('/');
        match style {
            MarkerStyle::TrailingSlash => format!("{key}/"),
            MarkerStyle::KeepFile => format!("{key}/{KEEP_FILE}"),
        }
    }

    /// Recover the entity path from a marker key.
    pub fn path_from_marker(marker_key: &str) -> String {
        let key = marker_key
            .strip_suffix(KEEP_FILE)
            .unwrap_or(marker_key)
            .trim_end_matches('/');
        format!("/{key}")
    }

    /// Normalize and check a folder or file name for use as a path segment.
    ///
    /// Returns the trimmed name.
    pub fn validate_segment(name: &str) -> AppResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        if name.len() > MAX_SEGMENT_LEN {
            return Err(AppError::validation(format!(
                "Name exceeds {MAX_SEGMENT_LEN} bytes"
            )));
        }
        if name == "." || name == ".." {
            return Err(AppError::validation("Name cannot be '.' or '..'"));
        }
        if name.contains('/') {
            return Err(AppError::validation("Name cannot contain '/'"));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::validation("Name cannot contain control characters"));
        }
        Ok(name.to_string())
    }

    /// Check a file name. On top of the segment rules, a file may not take
    /// the placeholder name, since its key would be its folder's marker.
    pub fn validate_file_name(name: &str) -> AppResult<String> {
        let name = Self::validate_segment(name)?;
        if name == KEEP_FILE {
            return Err(AppError::validation(format!(
                "'{KEEP_FILE}' is reserved for folder markers"
            )));
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_root_path() {
        assert_eq!(PathResolver::resolve(None, "docs"), "/docs");
    }

    #[test]
    fn test_child_path() {
        assert_eq!(PathResolver::resolve(Some("/docs"), "2024"), "/docs/2024");
        assert_eq!(
            PathResolver::resolve(Some("/docs/2024"), "report.pdf"),
            "/docs/2024/report.pdf"
        );
    }

    #[test]
    fn test_never_emits_trailing_or_double_slash() {
        let path = PathResolver::resolve(Some("/docs/"), "2024");
        assert_eq!(path, "/docs/2024");
        assert!(!path.ends_with('/'));
    }

    #[test]
    fn test_marker_styles() {
        assert_eq!(
            PathResolver::marker_key("/docs/2024", MarkerStyle::TrailingSlash),
            "docs/2024/"
        );
        assert_eq!(
            PathResolver::marker_key("/docs/2024", MarkerStyle::KeepFile),
            "docs/2024/.keep"
        );
    }

    #[test]
    fn test_marker_suffix_is_stripped_back() {
        for style in [MarkerStyle::TrailingSlash, MarkerStyle::KeepFile] {
            let key = PathResolver::marker_key("/docs/2024", style);
            assert_eq!(PathResolver::path_from_marker(&key), "/docs/2024");
        }
    }

    #[test]
    fn test_object_key_drops_leading_slash() {
        assert_eq!(
            PathResolver::object_key("/docs/2024/report.pdf"),
            "docs/2024/report.pdf"
        );
    }

    #[test]
    fn test_segment_validation() {
        assert_eq!(PathResolver::validate_segment("  docs ").unwrap(), "docs");
        for bad in ["", "   ", ".", "..", "a/b", "tab\there"] {
            let err = PathResolver::validate_segment(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "{bad:?}");
        }
        let long = "x".repeat(MAX_SEGMENT_LEN + 1);
        assert!(PathResolver::validate_segment(&long).is_err());
    }

    #[test]
    fn test_file_name_cannot_shadow_marker() {
        let err = PathResolver::validate_file_name(" .keep ").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(PathResolver::validate_segment(".keep").is_ok());
        assert_eq!(PathResolver::validate_file_name(".keeper").unwrap(), ".keeper");
    }
}
