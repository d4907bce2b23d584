//! Error types for structured output validation.

use std::fmt;

/// Validation error with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error message describing what went wrong
    pub message: String,
    /// JSON pointer to the error location (e.g., "/items/0/price")
    pub path: Option<String>,
}

impl ValidationError {
    /// Create an error with a path.
    pub fn with_path(message: impl Into<String>, path: String) -> Self {
        Self {
            message: message.into(),
            path: Some(path),
        }
    }

    /// Create an error without path.
    pub fn without_path(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_without_path() {
        let error = ValidationError::without_path("Invalid type");
        assert_eq!(error.to_string(), "Invalid type");
        assert!(error.path.is_none());
    }

    #[test]
    fn test_validation_error_display_with_path() {
        let error = ValidationError::with_path("Invalid type", "/user/name".to_string());
        assert_eq!(error.to_string(), "/user/name: Invalid type");
    }
}
