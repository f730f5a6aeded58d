//! # Error Types Module
//!
//! Request-scoped errors and their HTTP mapping. Nothing here is fatal to
//! the process; every variant is confined to the request that raised it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Errors surfaced by API operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing row, or a referential guard failed
    #[error("{0}")]
    NotFound(String),
    /// Malformed request input
    #[error("{0}")]
    BadRequest(String),
    /// No usable session user
    #[error("{0}")]
    Unauthorized(String),
    /// Query failure; the message names the failed operation
    #[error("{message}: {source}")]
    Database {
        message: String,
        #[source]
        source: sqlx::Error,
    },
    /// The write collides with a row the user does not own
    #[error("{0}")]
    Conflict(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wrap a sqlx error with the operation that failed
    pub fn database(message: &str, source: sqlx::Error) -> Self {
        AppError::Database {
            message: message.to_string(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

/// Attach the failed operation to a sqlx result
pub trait DbResultExt<T> {
    fn db_context(self, message: &str) -> AppResult<T>;
}

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn db_context(self, message: &str) -> AppResult<T> {
        self.map_err(|e| AppError::database(message, e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AppError::Database { message, source } => {
                error!("{}: {}", message, source);
                json!({ "message": message, "error": source.to_string() })
            }
            other => json!({ "message": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::database("Failed", sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Conflict("taken".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_database_error_message_keeps_operation() {
        let err: AppResult<()> = Err(sqlx::Error::RowNotFound).db_context("Failed to clear meal plan");
        let message = err.unwrap_err().to_string();
        assert!(message.starts_with("Failed to clear meal plan: "));
    }

    #[test]
    fn test_into_response_status() {
        let response = AppError::NotFound("Recipe not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
