//! Unified error handling.
//!
//! Repository operations and HTTP handlers share one error type. Store
//! failures carry the name of the repository operation that produced them;
//! the HTTP conversion hides those details from clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Failure reported by one of the data-access libraries.
#[cfg(feature = "database")]
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Orm(#[from] sea_orm::DbErr),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Store errors
    #[cfg(feature = "database")]
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    /// Operation on a repository whose connection has been released
    #[error("Repository unavailable: {0}")]
    State(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Store { .. } => "DATABASE_ERROR",
            AppError::State(_) => "STATE_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Store { operation, source } => {
                tracing::error!(operation, "Database error: {:?}", source);
                "A database error occurred".to_string()
            }
            AppError::State(msg) => {
                tracing::error!("Repository state error: {}", msg);
                "The data store is unavailable".to_string()
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }

    /// Name of the repository operation behind a store error, if any
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            #[cfg(feature = "database")]
            AppError::Store { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Extension trait tagging store failures with the operation that raised them
#[cfg(feature = "database")]
pub trait StoreResultExt<T> {
    fn store_context(self, operation: &'static str) -> AppResult<T>;
}

#[cfg(feature = "database")]
impl<T, E> StoreResultExt<T> for Result<T, E>
where
    E: Into<StoreError>,
{
    fn store_context(self, operation: &'static str) -> AppResult<T> {
        self.map_err(|e| AppError::Store {
            operation,
            source: e.into(),
        })
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        AppError::State(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
