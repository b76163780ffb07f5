//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_jwt, require_writer};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::list_projects,
        handlers::get_project,
        handlers::list_skills,
        handlers::submit_contact,
        handlers::login,
        handlers::get_current_user,
        handlers::logout,
        handlers::list_documents,
        handlers::add_document,
        handlers::get_document,
        handlers::set_document,
        handlers::update_document,
        handlers::delete_document,
        handlers::commit_batch,
    ),
    components(schemas(
        crate::api::types::ListProjectsResponse,
        crate::api::types::ListSkillsResponse,
        crate::api::types::AddDocumentResponse,
        crate::api::types::BatchRequest,
        crate::api::types::BatchResponse,
        crate::api::types::HealthResponse,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::LogoutResponse,
        crate::auth::SessionUser,
        crate::auth::UserRole,
        crate::domain::Project,
        crate::domain::Skill,
        crate::domain::SkillCategory,
        crate::domain::ContactMessage,
        crate::domain::SubmitStatus,
        crate::domain::SubmitStatusKind,
        crate::store::Collection,
        crate::store::Document,
        crate::store::BatchOp,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "portfolio", description = "Public project and skill listings"),
        (name = "contact", description = "Contact form relay"),
        (name = "store", description = "Admin document store"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Folio Core API",
        version = "0.1.0",
        description = "Portfolio site backend - public listings, contact relay and the admin document store",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router with optional authentication.
pub fn build_router(state: AppState, auth_enabled: bool) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/projects", get(handlers::list_projects))
        .route("/v1/projects/:id", get(handlers::get_project))
        .route("/v1/skills", get(handlers::list_skills))
        .route("/v1/contact", post(handlers::submit_contact))
        .route("/v1/auth/login", post(handlers::login));

    let store_routes = Router::new()
        .route("/v1/store/batch", post(handlers::commit_batch))
        .route(
            "/v1/store/:collection",
            get(handlers::list_documents).post(handlers::add_document),
        )
        .route(
            "/v1/store/:collection/:id",
            get(handlers::get_document)
                .put(handlers::set_document)
                .patch(handlers::update_document)
                .delete(handlers::delete_document),
        );

    let admin_routes = if auth_enabled {
        Router::new()
            .route("/v1/auth/me", get(handlers::get_current_user))
            .route("/v1/auth/logout", post(handlers::logout))
            .merge(store_routes.layer(middleware::from_fn(require_writer)))
            .layer(middleware::from_fn_with_state(
                state.jwt_manager.clone(),
                require_jwt,
            ))
    } else {
        tracing::warn!("Admin routes are served without authentication");
        store_routes
    };

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
