//! Wayfinder Error Types
//!
//! Centralized error handling for the dispatch core and its collaborators.

use thiserror::Error;

/// Central error type for Wayfinder
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Action failed: {0}")]
    Action(String),

    #[error("Action not supported by executor: {0}")]
    Unsupported(String),

    #[error("Envelope decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech output error: {0}")]
    Speech(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Wayfinder operations
pub type AssistantResult<T> = Result<T, AssistantError>;

impl AssistantError {
    /// Shorthand for an executor operation the backend does not implement
    pub fn unsupported(operation: &str) -> Self {
        AssistantError::Unsupported(operation.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AssistantError::Action("button not found".to_string());
        assert_eq!(err.to_string(), "Action failed: button not found");

        let err = AssistantError::unsupported("show_photos");
        assert_eq!(
            err.to_string(),
            "Action not supported by executor: show_photos"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        let err: AssistantError = parse.unwrap_err().into();
        assert!(matches!(err, AssistantError::Json(_)));
    }
}
