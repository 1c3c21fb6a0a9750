//! Error type system for the social API
//!
//! This module provides the crate-wide error type with:
//! - HTTP status code mapping
//! - Field-level error bodies for validation, lookup and conflict failures
//! - Traced JSON error bodies for everything else

use crate::auth::validation::ValidationErrors;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the social API
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    // Field-level errors, rendered as a bare field -> message object
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Resource not found: {0}")]
    NotFound(ValidationErrors),

    #[error("Conflict: {0}")]
    Conflict(ValidationErrors),

    // API-related errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Password hashing error: {0}")]
    HashingError(String),

    #[error("Task error: {0}")]
    TaskError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) | AppError::Conflict(_) | AppError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }

            // 401 Unauthorized
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            AppError::NotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            AppError::InitializationError(_)
            | AppError::ConfigError(_)
            | AppError::DatabaseError(_)
            | AppError::PoolError(_)
            | AppError::HashingError(_)
            | AppError::TaskError(_)
            | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InitializationError(_) => "InitializationError",
            AppError::ConfigError(_) => "ConfigError",
            AppError::DatabaseError(_) => "DatabaseError",
            AppError::PoolError(_) => "PoolError",
            AppError::Validation(_) => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::Conflict(_) => "Conflict",
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::AuthenticationError(_) => "AuthenticationError",
            AppError::HashingError(_) => "HashingError",
            AppError::TaskError(_) => "TaskError",
            AppError::IoError(_) => "IoError",
        }
    }

    /// The field mapping carried by validation, lookup and conflict errors
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation(errors) | AppError::NotFound(errors) | AppError::Conflict(errors) => {
                Some(errors)
            }
            _ => None,
        }
    }

    /// Whether the failure was a UNIQUE constraint rejection from SQLite
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::DatabaseError(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
            }
            _ => false,
        }
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            details: None,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an error response from an AppError
    pub fn from_error(error: &AppError) -> Self {
        Self::new(error.error_type().to_string(), error.to_string())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} (trace_id: {})",
            self.error,
            self.message,
            self.details.as_ref().map_or("", |_| "with details"),
            self.trace_id
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        // Client-facing field errors go out as the mapping itself
        if let Some(errors) = self.field_errors() {
            tracing::debug!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
            return (status_code, Json(errors.clone())).into_response();
        }

        let error_response = ErrorResponse::from_error(&self);

        tracing::error!(
            error_type = self.error_type(),
            trace_id = %error_response.trace_id,
            status_code = %status_code,
            "Request failed: {}",
            self
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Context extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let context_str = context.into();
            AppError::InitializationError(format!("{}: {}", context_str, e))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context_str = f();
            AppError::InitializationError(format!("{}: {}", context_str, e))
        })
    }
}
