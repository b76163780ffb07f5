//! Folio Core - portfolio site backend.
//!
//! Serves the public portfolio API, the contact relay and the admin
//! document store.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tokio::net::TcpListener;

use folio_core::api::build_router;
use folio_core::auth::{JwtManager, UserStore};
use folio_core::config::{Config, DatabaseConfig, RelayConfig};
use folio_core::logging;
use folio_core::relay::{ContactRelay, DisabledRelay, EmailJsRelay};
use folio_core::store::{DocumentStore, InMemoryDocumentStore, SqliteDocumentStore};
use folio_core::AppState;

/// `database.url` value selecting the in-memory store.
const MEMORY_STORE: &str = "memory";

async fn open_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if config.url == MEMORY_STORE {
        tracing::warn!("Using the in-memory store; data is lost on restart");
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    let store = SqliteDocumentStore::new(pool);
    store.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");
    Ok(Arc::new(store))
}

fn build_relay(config: &RelayConfig) -> anyhow::Result<Arc<dyn ContactRelay>> {
    if !config.enabled {
        tracing::info!("Email relay disabled");
        return Ok(Arc::new(DisabledRelay));
    }

    let relay = EmailJsRelay::new(config.clone())
        .map_err(|e| anyhow::anyhow!("Relay configuration error: {}", e))?;
    tracing::info!(endpoint = %config.endpoint, "Email relay enabled");
    Ok(Arc::new(relay))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Folio Core v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        auth_enabled = %config.auth.enabled,
        "Configuration loaded"
    );

    let store = open_store(&config.database).await?;
    let relay = build_relay(&config.relay)?;

    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_duration_hours,
    );
    let user_store = UserStore::new(config.auth.users.clone());

    if config.auth.enabled {
        if user_store.is_empty() {
            tracing::warn!("No admin users configured; nobody can sign in");
        }
        tracing::info!(users = user_store.len(), "Authentication enabled");
    } else {
        tracing::warn!("Authentication is DISABLED - enable for production");
    }

    let state = AppState {
        store,
        jwt_manager,
        user_store,
        relay,
    };

    let app = build_router(state, config.auth.enabled);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
