//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
///
/// The variants mirror the HTTP error taxonomy: malformed or duplicate input
/// is `Validation` (400), an anonymous caller on a protected action is
/// `Unauthorized` (401), a non-author mutating someone else's recipe is
/// `Forbidden` (403), and a missing entity is `NotFound` (404).
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed, missing, or duplicate input
    #[error("{0}")]
    Validation(String),

    /// Anonymous caller on a protected action
    #[error("Authentication credentials were not provided")]
    Unauthorized,

    /// Caller is not allowed to perform this action
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),

    /// Internal server error
    #[error("Internal server error")]
    Internal,
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            // Constraint violations are caller mistakes, not server faults.
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return ApiError::Validation("value already exists".to_string());
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return ApiError::Validation("referenced entity does not exist".to_string());
                }
                sqlx::error::ErrorKind::CheckViolation => {
                    return ApiError::Validation("value is out of range".to_string());
                }
                _ => {}
            }
        }
        ApiError::Database(common::error::DatabaseError::Query(err))
    }
}

impl ApiError {
    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Database(err) => {
                tracing::error!("Database failure: {}", err);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "errors": message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Recipe").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_entity() {
        assert_eq!(ApiError::NotFound("Recipe").to_string(), "Recipe not found");
    }
}
