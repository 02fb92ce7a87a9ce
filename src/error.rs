//! Error types for the watering controller
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the controller
#[derive(Debug, Error)]
pub enum WateringError {
    /// Configuration attributes are missing or malformed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Board or pin could not be resolved or reached
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Operation not possible in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WateringError {
    /// Build a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build a resource-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ResourceUnavailable(message.into())
    }
}

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, WateringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error() {
        let err = WateringError::configuration("Missing required board_name attribute.");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required board_name attribute."
        );
    }

    #[test]
    fn test_resource_unavailable_error() {
        let err = WateringError::unavailable("pin 40 not found on board local");
        assert_eq!(err.to_string(), "Resource unavailable: pin 40 not found on board local");
    }

    #[test]
    fn test_invalid_state_error() {
        let err = WateringError::InvalidState("no async runtime".to_string());
        assert_eq!(err.to_string(), "Invalid state: no async runtime");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: WateringError = io_err.into();
        assert!(matches!(err, WateringError::Io(_)));
        assert!(err.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: WateringError = json_err.into();
        assert!(matches!(err, WateringError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<bool> {
            Ok(true)
        }

        fn returns_err() -> Result<bool> {
            Err(WateringError::unavailable("board offline"))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
