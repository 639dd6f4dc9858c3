//! Saved view store error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewStoreError {
    #[error("View store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("View not found: {0}")]
    NotFound(String),

    #[error("Invalid view id '{0}': must be 1-128 characters of letters, digits, '-' or '_'")]
    InvalidId(String),
}

impl From<serde_json::Error> for ViewStoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ViewStoreError::NotFound("hot-leads".to_string());
        assert_eq!(err.to_string(), "View not found: hot-leads");
    }

    #[test]
    fn test_invalid_id_display() {
        let err = ViewStoreError::InvalidId("../etc".to_string());
        assert!(err.to_string().starts_with("Invalid view id '../etc'"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ViewStoreError = parse_err.into();
        assert!(matches!(err, ViewStoreError::Serialization(_)));
    }
}
