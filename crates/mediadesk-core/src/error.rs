//! Error types module
//!
//! This module provides the core error types used throughout the Mediadesk
//! application. All errors are unified under the `AppError` enum which can
//! represent authentication, classification, storage, and I/O errors.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like resource limits
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_SIGNATURE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("File size {size} bytes exceeds limit of {limit} bytes")]
    SizeLimitExceeded { size: u64, limit: u64 },

    #[error("Invalid media category: {0}")]
    InvalidCategory(String),

    #[error("Move failed: {0}")]
    Move(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

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

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::Authentication(_) => (
            400,
            "AUTHENTICATION_ERROR",
            false,
            Some("Include a valid signature header and request body"),
            true,
            LogLevel::Warn,
        ),
        AppError::InvalidSignature => (
            401,
            "INVALID_SIGNATURE",
            false,
            Some("Verify the shared secret used to sign the payload"),
            true,
            LogLevel::Warn,
        ),
        AppError::SizeLimitExceeded { .. } => (
            413,
            "SIZE_LIMIT_EXCEEDED",
            false,
            Some("Send a smaller attachment"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidCategory(_) => (
            422,
            "INVALID_CATEGORY",
            false,
            Some("Contact support if this error persists"),
            true,
            LogLevel::Error,
        ),
        AppError::Move(_) => (
            500,
            "MOVE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::HttpClient(_) => (
            502,
            "UPSTREAM_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::Io(_) => (
            500,
            "IO_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Authentication(_) => "Authentication",
            AppError::InvalidSignature => "InvalidSignature",
            AppError::SizeLimitExceeded { .. } => "SizeLimitExceeded",
            AppError::InvalidCategory(_) => "InvalidCategory",
            AppError::Move(_) => "Move",
            AppError::HttpClient(_) => "HttpClient",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Io(_) => "Io",
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

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            // Generic rejection, no detail leaked to the caller
            AppError::Authentication(_) => "Authentication failed".to_string(),
            AppError::InvalidSignature => "Authentication failed".to_string(),
            AppError::SizeLimitExceeded { size, limit } => {
                format!(
                    "File size {:.2} MB exceeds the {:.2} MB limit",
                    *size as f64 / 1_048_576.0,
                    *limit as f64 / 1_048_576.0
                )
            }
            AppError::InvalidCategory(_) => "Invalid media category".to_string(),
            AppError::Move(_) => "Failed to store attachment".to_string(),
            AppError::HttpClient(_) => "Failed to retrieve attachment".to_string(),
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Io(_) => "Internal server error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_authentication() {
        let err = AppError::Authentication("missing signature header".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "AUTHENTICATION_ERROR");
        assert!(!err.is_recoverable());
        // Internal detail never reaches the client
        assert_eq!(err.client_message(), "Authentication failed");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_invalid_signature() {
        let err = AppError::InvalidSignature;
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "INVALID_SIGNATURE");
        assert_eq!(err.client_message(), "Authentication failed");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_size_limit_exceeded() {
        let err = AppError::SizeLimitExceeded {
            size: 2 * 1024 * 1024,
            limit: 1024 * 1024,
        };
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "SIZE_LIMIT_EXCEEDED");
        assert!(!err.is_recoverable());
        assert!(err.client_message().contains("2.00 MB"));
        assert!(err.client_message().contains("1.00 MB"));
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_invalid_category() {
        let err = AppError::InvalidCategory("sticker".to_string());
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_CATEGORY");
        assert_eq!(err.log_level(), LogLevel::Error);
        assert_eq!(err.client_message(), "Invalid media category");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = AppError::from(io_err);
        assert_eq!(err.error_type(), "Io");
        assert_eq!(err.http_status_code(), 500);
    }
}
