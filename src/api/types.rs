//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::SessionUser;
use crate::domain::{Project, Skill};
use crate::store::BatchOp;

// ==================== Public reads ====================

/// Query parameters for listing projects.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListProjectsQuery {
    /// Only featured (true) or non-featured (false) projects.
    #[serde(default)]
    pub featured: Option<bool>,
}

/// Query parameters for listing skills.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListSkillsQuery {
    /// One of frontend, backend, database, devops, other.
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProjectsResponse {
    pub projects: Vec<Project>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListSkillsResponse {
    pub skills: Vec<Skill>,
    pub total: usize,
}

// ==================== Document store ====================

/// Response to adding a document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddDocumentResponse {
    /// Store-assigned identifier.
    pub id: String,
}

/// An atomic group of writes.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchRequest {
    pub ops: Vec<BatchOp>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchResponse {
    /// Number of ops applied.
    pub applied: usize,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Store connectivity.
    pub store: String,
    /// Timestamp.
    pub timestamp: String,
}

// ==================== Authentication ====================

/// Login request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// JWT token.
    pub token: String,
    /// User information.
    pub user: SessionUser,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}
