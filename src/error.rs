//! Error types for Folio Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for Folio Core operations.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Email relay error: {0}")]
    Relay(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FolioError {
    /// Whether retrying the same operation later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FolioError::Unavailable(_) | FolioError::Database(sqlx::Error::PoolTimedOut)
        )
    }
}

/// Only failures to reach the peer are transient. A request that could not
/// be built or a response that could not be read fails the same way again.
impl From<reqwest::Error> for FolioError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            FolioError::Internal(format!("Invalid outbound request: {}", e))
        } else if e.is_decode() {
            FolioError::Internal(format!("Malformed response: {}", e))
        } else if e.is_connect() || e.is_timeout() || e.is_request() {
            FolioError::Unavailable(e.to_string())
        } else {
            FolioError::Internal(format!("HTTP client error: {}", e))
        }
    }
}

/// Error response body for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for FolioError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            FolioError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None),
            FolioError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            FolioError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
            }
            FolioError::PermissionDenied(msg) => (
                StatusCode::FORBIDDEN,
                "PERMISSION_DENIED",
                msg.clone(),
                None,
            ),
            FolioError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None),
            FolioError::Unavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "UNAVAILABLE",
                msg.clone(),
                None,
            ),
            FolioError::Relay(msg) => {
                tracing::warn!(error = %msg, "Email relay failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "RELAY_ERROR",
                    "The message could not be delivered".to_string(),
                    None,
                )
            }
            FolioError::Database(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    None,
                )
            }
            FolioError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            FolioError::Serialization(e) => (
                StatusCode::BAD_REQUEST,
                "SERIALIZATION_ERROR",
                "Failed to process request/response".to_string(),
                Some(e.to_string()),
            ),
            FolioError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for Folio operations.
pub type FolioResult<T> = Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(FolioError::Unavailable("offline".to_string()).is_transient());
        assert!(FolioError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!FolioError::BadRequest("bad".to_string()).is_transient());
        assert!(!FolioError::PermissionDenied("no".to_string()).is_transient());
    }

    #[test]
    fn test_request_build_failure_is_permanent() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        assert!(err.is_builder());

        let err = FolioError::from(err);
        assert!(matches!(err, FolioError::Internal(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .unwrap_err();

        let err = FolioError::from(err);
        assert!(matches!(err, FolioError::Unavailable(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FolioError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (FolioError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                FolioError::Unavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (FolioError::PermissionDenied("x".into()), StatusCode::FORBIDDEN),
            (FolioError::Relay("x".into()), StatusCode::BAD_GATEWAY),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
