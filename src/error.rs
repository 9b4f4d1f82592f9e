//! Error types for Grocer
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Grocer
#[derive(Debug, Error)]
pub enum GrocerError {
    /// Non-positive frequency, time frame or grocery-day count
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Quotient or accumulator outside its documented domain
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Food item not found in storage
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// List generation requested on a day that is not a grocery day
    #[error("Not a grocery day: {0}")]
    NotAGroceryDay(String),

    /// Storage/persistence error
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Grocer operations
pub type Result<T> = std::result::Result<T, GrocerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_error() {
        let err = GrocerError::InvalidConfiguration("time frame must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: time frame must be positive");
    }

    #[test]
    fn test_invalid_state_error() {
        let err = GrocerError::InvalidState("accumulator is negative".to_string());
        assert_eq!(err.to_string(), "Invalid state: accumulator is negative");
    }

    #[test]
    fn test_item_not_found_error() {
        let err = GrocerError::ItemNotFound("1738300800123-a1b2".to_string());
        assert_eq!(err.to_string(), "Item not found: 1738300800123-a1b2");
    }

    #[test]
    fn test_not_a_grocery_day_error() {
        let err = GrocerError::NotAGroceryDay("2026-10-18".to_string());
        assert_eq!(err.to_string(), "Not a grocery day: 2026-10-18");
    }

    #[test]
    fn test_storage_error() {
        let err = GrocerError::Storage("file locked".to_string());
        assert_eq!(err.to_string(), "Storage error: file locked");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GrocerError = io_err.into();
        assert!(matches!(err, GrocerError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: GrocerError = json_err.into();
        assert!(matches!(err, GrocerError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(GrocerError::InvalidState("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
