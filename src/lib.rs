//! Folio Core - portfolio site backend.
//!
//! Serves project and skill listings from a document store, relays contact
//! messages, and provides the admin dashboard logic that keeps local state in
//! step with the store over an unreliable connection.

use std::sync::Arc;

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod relay;
pub mod site;
pub mod store;
pub mod sync;

use crate::auth::{JwtManager, UserStore};
use crate::relay::ContactRelay;
use crate::store::DocumentStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Backing document store.
    pub store: Arc<dyn DocumentStore>,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Config-based admin users.
    pub user_store: UserStore,
    /// Contact message delivery.
    pub relay: Arc<dyn ContactRelay>,
}
