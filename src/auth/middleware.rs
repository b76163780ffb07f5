//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::{Claims, JwtManager};

/// Error response for authentication failures.
#[derive(Debug, Serialize)]
pub struct AuthError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl AuthError {
    fn unauthorized(error: &str, code: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: error.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Pull the bearer token out of the Authorization header.
pub fn bearer_token<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Extract and validate JWT token from request.
///
/// Expects `Authorization: Bearer <token>` header.
pub async fn require_jwt(
    State(jwt_manager): State<JwtManager>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AuthError::unauthorized("Missing authorization token", "MISSING_TOKEN"))?;

    let claims = jwt_manager.validate_token(token).await.map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::unauthorized("Invalid or expired token", "INVALID_TOKEN")
    })?;

    // Add claims to request extensions for handlers to access
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Middleware that lets only writers through for mutating methods.
///
/// Must run after `require_jwt`.
pub async fn require_writer(request: Request<Body>, next: Next) -> Result<Response, AuthError> {
    if request.method() == Method::GET {
        return Ok(next.run(request).await);
    }

    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AuthError::unauthorized("Authentication required", "UNAUTHENTICATED"))?;

    if !claims.role.can_write() {
        tracing::warn!(user_id = %claims.sub, method = %request.method(), "Write denied");
        return Err(AuthError {
            status: StatusCode::FORBIDDEN,
            error: "Insufficient permissions".to_string(),
            code: "PERMISSION_DENIED".to_string(),
        });
    }

    Ok(next.run(request).await)
}
