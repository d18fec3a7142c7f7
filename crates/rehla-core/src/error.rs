//! Error types module
//!
//! This module provides the core error types used throughout the rehla
//! toolkit. All errors are unified under the `AppError` enum which can
//! represent API transport, validation, and gallery-workflow errors.

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Gallery must contain at least one image")]
    EmptyGallery,

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl AppError {
    /// Get the error type name for detailed error reporting
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Api { .. } => "Api",
            AppError::EmptyGallery => "EmptyGallery",
            AppError::ExportFailed(_) => "ExportFailed",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        // Add source error chain
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_names() {
        assert_eq!(
            AppError::InvalidInput("bad".to_string()).error_type(),
            "InvalidInput"
        );
        assert_eq!(AppError::EmptyGallery.error_type(), "EmptyGallery");
        assert_eq!(
            AppError::Api {
                status: 500,
                message: "boom".to_string()
            }
            .error_type(),
            "Api"
        );
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let inner = anyhow::anyhow!("connection refused");
        let err = AppError::from(inner.context("failed to prepare images"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("Caused by: failed to prepare images"));
        assert!(details.contains("Caused by: connection refused"));
    }

    #[test]
    fn test_api_error_display() {
        let err = AppError::Api {
            status: 422,
            message: "missing title".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 422: missing title"
        );
    }
}
