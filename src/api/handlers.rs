//! HTTP request handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::api::types::*;
use crate::auth::{Claims, SessionUser};
use crate::domain::{ContactMessage, Project, Record, Skill, SkillCategory, SubmitStatus};
use crate::error::{FolioError, FolioResult};
use crate::relay::submit_contact as relay_contact;
use crate::store::{fields_from_value, Collection, Document};
use crate::AppState;

fn parse_collection(name: &str) -> FolioResult<Collection> {
    name.parse::<Collection>().map_err(FolioError::NotFound)
}

/// Load a collection as records, skipping documents that no longer parse.
async fn load_records<R: Record>(state: &AppState) -> FolioResult<Vec<R>> {
    let docs = state.store.get_all(R::COLLECTION).await?;
    Ok(docs
        .into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            R::from_document(doc)
                .map_err(|e| {
                    tracing::warn!(
                        collection = %R::COLLECTION,
                        id = %id,
                        error = %e,
                        "Skipping invalid document"
                    );
                })
                .ok()
        })
        .collect())
}

// ==================== Public ====================

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_status = match state.store.ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// List portfolio projects.
///
/// GET /v1/projects
#[utoipa::path(
    get,
    path = "/v1/projects",
    params(ListProjectsQuery),
    responses(
        (status = 200, description = "Projects in display order", body = ListProjectsResponse),
        (status = 503, description = "Store unavailable")
    ),
    tag = "portfolio"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ListProjectsQuery>,
) -> FolioResult<Json<ListProjectsResponse>> {
    let mut projects: Vec<Project> = load_records(&state).await?;
    if let Some(featured) = query.featured {
        projects.retain(|p| p.featured == featured);
    }

    Ok(Json(ListProjectsResponse {
        total: projects.len(),
        projects,
    }))
}

/// GET /v1/projects/:id
#[utoipa::path(
    get,
    path = "/v1/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = Project),
        (status = 404, description = "Project not found")
    ),
    tag = "portfolio"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> FolioResult<Json<Project>> {
    let doc = state
        .store
        .get(Collection::Projects, &id)
        .await?
        .ok_or_else(|| FolioError::NotFound(format!("Project {} not found", id)))?;

    Ok(Json(Project::from_document(doc)?))
}

/// List skills, optionally by category.
///
/// GET /v1/skills
#[utoipa::path(
    get,
    path = "/v1/skills",
    params(ListSkillsQuery),
    responses(
        (status = 200, description = "Skills", body = ListSkillsResponse),
        (status = 400, description = "Unknown category")
    ),
    tag = "portfolio"
)]
pub async fn list_skills(
    State(state): State<AppState>,
    Query(query): Query<ListSkillsQuery>,
) -> FolioResult<Json<ListSkillsResponse>> {
    let category = query
        .category
        .as_deref()
        .map(|c| c.parse::<SkillCategory>().map_err(FolioError::BadRequest))
        .transpose()?;

    let mut skills: Vec<Skill> = load_records(&state).await?;
    if let Some(category) = category {
        skills.retain(|s| s.category == category);
    }

    Ok(Json(ListSkillsResponse {
        total: skills.len(),
        skills,
    }))
}

/// Send a contact form message through the email relay.
///
/// POST /v1/contact
#[utoipa::path(
    post,
    path = "/v1/contact",
    request_body = ContactMessage,
    responses(
        (status = 200, description = "Message sent", body = SubmitStatus),
        (status = 400, description = "Invalid message"),
        (status = 502, description = "Relay failed", body = SubmitStatus)
    ),
    tag = "contact"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(message): Json<ContactMessage>,
) -> FolioResult<(StatusCode, Json<SubmitStatus>)> {
    message.validate()?;

    let status = relay_contact(state.relay.as_ref(), &message).await;
    let code = if status == SubmitStatus::success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };
    Ok((code, Json(status)))
}

// ==================== Authentication ====================

/// Login to obtain a JWT token.
///
/// POST /v1/auth/login
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> FolioResult<Json<LoginResponse>> {
    let user = state
        .user_store
        .authenticate(&request.email, &request.password)
        .ok_or_else(|| {
            tracing::warn!(email = %request.email, "Failed login attempt");
            FolioError::Unauthorized("Invalid email or password".to_string())
        })?;

    let token = state
        .jwt_manager
        .generate_token(&user.id, &user.email, user.role)?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        role = ?user.role,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        token,
        user: SessionUser {
            id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
        },
        expires_in: state.jwt_manager.token_duration_hours() * 3600,
    }))
}

/// Get current user info from JWT token.
///
/// GET /v1/auth/me
#[utoipa::path(
    get,
    path = "/v1/auth/me",
    responses(
        (status = 200, description = "Current user info", body = SessionUser),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_current_user(Extension(claims): Extension<Claims>) -> Json<SessionUser> {
    Json(SessionUser::from(&claims))
}

/// Revoke the presented token.
///
/// POST /v1/auth/logout
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = LogoutResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Json<LogoutResponse> {
    state.jwt_manager.revoke(&claims).await;
    Json(LogoutResponse {
        message: "Signed out".to_string(),
    })
}

// ==================== Document store ====================

/// GET /v1/store/:collection
#[utoipa::path(
    get,
    path = "/v1/store/{collection}",
    params(
        ("collection" = String, Path, description = "projects or skills")
    ),
    responses(
        (status = 200, description = "All documents", body = Vec<Document>),
        (status = 404, description = "Unknown collection")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> FolioResult<Json<Vec<Document>>> {
    let collection = parse_collection(&collection)?;
    Ok(Json(state.store.get_all(collection).await?))
}

/// Add a document under a store-assigned id.
///
/// POST /v1/store/:collection
#[utoipa::path(
    post,
    path = "/v1/store/{collection}",
    params(
        ("collection" = String, Path, description = "projects or skills")
    ),
    responses(
        (status = 201, description = "Document added", body = AddDocumentResponse),
        (status = 400, description = "Invalid document"),
        (status = 403, description = "Permission denied")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn add_document(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> FolioResult<(StatusCode, Json<AddDocumentResponse>)> {
    let collection = parse_collection(&collection)?;
    let id = state.store.add(collection, fields_from_value(body)?).await?;

    tracing::info!(collection = %collection, id = %id, "Document added");
    Ok((StatusCode::CREATED, Json(AddDocumentResponse { id })))
}

/// GET /v1/store/:collection/:id
#[utoipa::path(
    get,
    path = "/v1/store/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "projects or skills"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "The document", body = Document),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> FolioResult<Json<Document>> {
    let collection = parse_collection(&collection)?;
    state
        .store
        .get(collection, &id)
        .await?
        .map(Json)
        .ok_or_else(|| FolioError::NotFound(format!("Document {}/{} not found", collection, id)))
}

/// Create or replace a document.
///
/// PUT /v1/store/:collection/:id
#[utoipa::path(
    put,
    path = "/v1/store/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "projects or skills"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document written"),
        (status = 400, description = "Invalid document")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn set_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> FolioResult<StatusCode> {
    let collection = parse_collection(&collection)?;
    state
        .store
        .set(collection, &id, fields_from_value(body)?)
        .await?;

    tracing::info!(collection = %collection, id = %id, "Document set");
    Ok(StatusCode::NO_CONTENT)
}

/// Merge fields into an existing document.
///
/// PATCH /v1/store/:collection/:id
#[utoipa::path(
    patch,
    path = "/v1/store/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "projects or skills"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document updated"),
        (status = 400, description = "Merged document is invalid"),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn update_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> FolioResult<StatusCode> {
    let collection = parse_collection(&collection)?;
    state
        .store
        .update(collection, &id, fields_from_value(body)?)
        .await?;

    tracing::info!(collection = %collection, id = %id, "Document updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/store/:collection/:id
#[utoipa::path(
    delete,
    path = "/v1/store/{collection}/{id}",
    params(
        ("collection" = String, Path, description = "projects or skills"),
        ("id" = String, Path, description = "Document ID")
    ),
    responses(
        (status = 204, description = "Document deleted")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> FolioResult<StatusCode> {
    let collection = parse_collection(&collection)?;
    state.store.delete(collection, &id).await?;

    tracing::info!(collection = %collection, id = %id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a group of writes atomically.
///
/// POST /v1/store/batch
#[utoipa::path(
    post,
    path = "/v1/store/batch",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "Every op applied", body = BatchResponse),
        (status = 400, description = "An op was invalid; nothing applied")
    ),
    security(("bearer_auth" = [])),
    tag = "store"
)]
pub async fn commit_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> FolioResult<Json<BatchResponse>> {
    let applied = request.ops.len();
    state.store.commit_batch(request.ops).await?;

    tracing::info!(ops = applied, "Batch committed");
    Ok(Json(BatchResponse { applied }))
}
