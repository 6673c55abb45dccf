//! Error types for Frontdesk
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse` for proper HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// This enum represents all possible errors that can occur
/// in the application. It implements `IntoResponse` to
/// automatically convert errors to appropriate HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Validation error (400)
    #[error("{0}")]
    Validation(String),

    /// Duplicate resource (400 - the HTTP surface uses 400, not 409,
    /// for an already-taken username)
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or failed token verification (401)
    #[error("Invalid credentials")]
    Unauthorized,

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Maps each error variant to an HTTP status code and a terse
    /// plain-text body. Store and internal failures never leak detail
    /// to the client; it is logged server-side instead.
    fn into_response(self) -> Response {
        let (status, message, error_type) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "validation"),
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg.clone(), "conflict"),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, self.to_string(), "unauthorized")
            }
            AppError::Database(error) => {
                tracing::error!(%error, "Store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error".to_string(),
                    "database",
                )
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error".to_string(),
                    "config",
                )
            }
            AppError::Internal(error) => {
                tracing::error!(%error, "Internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server Error".to_string(),
                    "internal",
                )
            }
        };

        // Record error metric
        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        (status, message).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_never_names_the_failing_field() {
        // Unknown username and wrong password render identically.
        assert_eq!(AppError::Unauthorized.to_string(), "Invalid credentials");
    }

    #[test]
    fn database_errors_render_generic_body() {
        let error = AppError::Database(sqlx::Error::PoolClosed);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_carries_its_message() {
        let error = AppError::Validation("All fields are required".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
