//! Filter decoding errors
//!
//! Only [`try_deserialize`](super::codec::try_deserialize) surfaces these.
//! Every public entry point that a UI calls degrades to an empty filter
//! instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid filter JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Filter JSON is {size} bytes, maximum is {max}")]
    TooLarge { size: usize, max: usize },

    #[error("Filter nesting depth exceeds maximum of {max}")]
    TooDeep { max: usize },

    #[error("Filter node id is empty or not unique: '{0}'")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_display() {
        let err = FilterError::TooLarge {
            size: 70_000,
            max: 65_536,
        };
        assert_eq!(
            err.to_string(),
            "Filter JSON is 70000 bytes, maximum is 65536"
        );
    }

    #[test]
    fn test_too_deep_display() {
        let err = FilterError::TooDeep { max: 16 };
        assert_eq!(
            err.to_string(),
            "Filter nesting depth exceeds maximum of 16"
        );
    }

    #[test]
    fn test_duplicate_id_display() {
        let err = FilterError::DuplicateId("c1".to_string());
        assert_eq!(err.to_string(), "Filter node id is empty or not unique: 'c1'");
    }

    #[test]
    fn test_invalid_json_from() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: FilterError = parse_err.into();
        assert!(err.to_string().starts_with("Invalid filter JSON:"));
    }
}
