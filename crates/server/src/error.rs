//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server-side failures to
//! Sentry and the structured log before responding. Clients get the HTTP
//! taxonomy and, for 5xx responses, a generic message only - raw error
//! detail never leaves the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::kv::StoreError;
use crate::services::auth::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request body was not valid JSON (or not JSON at all).
    #[error("Invalid request body: {0}")]
    BadJson(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Key-value store failure.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Auth platform failure.
    #[error("Auth platform error: {0}")]
    Auth(#[from] AuthError),

    /// A record failed to serialize or deserialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error envelope sent to clients.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadJson(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Auth(err) => match err {
                AuthError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::Rejected(_) => StatusCode::BAD_REQUEST,
                AuthError::Request(_) | AuthError::Response(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Store(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to expose to the client. Server-side detail collapses
    /// to a generic line; input errors keep their specifics.
    fn client_message(&self) -> String {
        match self {
            Self::Validation(_)
            | Self::BadJson(_)
            | Self::NotFound(_)
            | Self::Unauthorized(_) => self.to_string(),
            Self::Auth(err) => match err {
                AuthError::Timeout => "Upstream service timed out".to_string(),
                AuthError::InvalidToken => "Unauthorized".to_string(),
                AuthError::Rejected(message) => message.clone(),
                AuthError::Request(_) | AuthError::Response(_) => {
                    "External service error".to_string()
                }
            },
            Self::Store(_) | Self::Serialization(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; the client never sees the detail
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = axum::Json(ErrorBody {
            error: self.client_message(),
        });

        (self.status(), body).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("missing fields".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("order".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Store(StoreError::Backend("disk on fire".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Auth(AuthError::Timeout).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            ApiError::Auth(AuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_server_detail_is_not_exposed() {
        let err = ApiError::Store(StoreError::Backend("connection refused to 10.0.0.3".into()));
        assert_eq!(err.client_message(), "Internal server error");

        let err = ApiError::Auth(AuthError::Request("dns failure".into()));
        assert_eq!(err.client_message(), "External service error");
    }

    #[test]
    fn test_input_errors_keep_their_message() {
        let err = ApiError::Validation("Missing required fields".into());
        assert_eq!(err.client_message(), "Validation error: Missing required fields");

        let err = ApiError::Auth(AuthError::Rejected("User already registered".into()));
        assert_eq!(err.client_message(), "User already registered");
    }
}
