//! Application error type mapping to HTTP status codes and a JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use studyhall_types::error::{AuthError, ChatError, RepositoryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication / account errors.
    Auth(AuthError),
    /// Chat flow errors.
    Chat(ChatError),
    /// Validation error.
    Validation(String),
    /// Missing resource.
    NotFound(String),
    /// Authenticated but not allowed.
    Forbidden(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => AppError::NotFound("Resource not found".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid or expired token".to_string(),
            ),
            AppError::Auth(AuthError::Inactive) => (
                StatusCode::FORBIDDEN,
                "ACCOUNT_INACTIVE",
                "Account is deactivated".to_string(),
            ),
            AppError::Auth(e @ AuthError::UsernameTaken(_)) => {
                (StatusCode::CONFLICT, "CONFLICT", e.to_string())
            }
            AppError::Auth(e @ AuthError::EmailTaken(_)) => {
                (StatusCode::CONFLICT, "CONFLICT", e.to_string())
            }
            AppError::Auth(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR", e.to_string())
            }
            AppError::Chat(ChatError::SessionNotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Chat(ChatError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message text must not be empty".to_string(),
            ),
            AppError::Chat(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CHAT_ERROR", e.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
