//! HTTP API layer for Folio Core.
//!
//! Public endpoints serve the portfolio and relay contact messages; admin
//! endpoints expose the document store behind JWT authentication.

pub mod handlers;
mod routes;
pub mod types;

pub use routes::{build_router, ApiDoc};
