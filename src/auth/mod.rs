//! Authentication module for Folio Core.
//!
//! Admin users sign in with configured credentials and receive a JWT.
//! Signing out revokes the token. Views get the session as an explicit
//! `Session` value.

mod jwt;
mod middleware;
mod session;

pub use jwt::*;
pub use middleware::*;
pub use session::*;
