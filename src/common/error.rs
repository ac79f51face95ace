//! Unified error type (thiserror).
//!
//! `ActivosError` carries the full internal detail for logs; HTTP responses
//! go through `external_message()` so internal strings never leak to
//! clients.

use axum::http::StatusCode;
use thiserror::Error;

/// Service error type
#[derive(Debug, Error)]
pub enum ActivosError {
    /// Configuration error (startup only)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (missing/invalid input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Password hash error
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// JWT error
    #[error("JWT error: {0}")]
    Jwt(String),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Authorization error
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Conflict error (e.g. duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActivosError {
    /// Returns a safe message for external clients.
    ///
    /// Validation, not-found, conflict and authentication messages are
    /// written for end users and pass through verbatim; everything else
    /// collapses to a generic string while the full detail stays in the
    /// server log.
    pub fn external_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(msg) => msg.clone(),
            Self::Conflict(msg) => msg.clone(),
            Self::Authentication(msg) => msg.clone(),
            Self::Config(_) => "Configuration error".to_string(),
            Self::Database(_) => "Database error".to_string(),
            Self::PasswordHash(_) => "Authentication error".to_string(),
            Self::Jwt(_) => "Authentication error".to_string(),
            Self::Authorization(_) => "Access denied".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Jwt(_) => StatusCode::UNAUTHORIZED,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
            Self::Authorization(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Result type alias
pub type ActivosResult<T> = Result<T, ActivosError>;
