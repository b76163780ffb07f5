//! Session context passed explicitly to admin views.
//!
//! Lifecycle: `Unauthenticated -> Authenticated -> SignedOut`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Claims, JwtManager, UserRole};
use crate::error::{FolioError, FolioResult};

/// The signed-in user as seen by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&Claims> for SessionUser {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Unauthenticated,
    Authenticated {
        token: String,
        user: SessionUser,
    },
    SignedOut,
}

impl Session {
    pub fn authenticated(token: impl Into<String>, user: SessionUser) -> Self {
        Session::Authenticated {
            token: token.into(),
            user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Session::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match self {
            Session::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Move to `SignedOut`. Only an authenticated session can sign out.
    pub fn sign_out(&mut self) -> FolioResult<()> {
        if !self.is_authenticated() {
            return Err(FolioError::BadRequest("No active session".to_string()));
        }
        *self = Session::SignedOut;
        Ok(())
    }
}

/// Whoever can end a session on the server side.
#[async_trait]
pub trait SessionAuthority: Send + Sync {
    async fn sign_out(&self, session: &Session) -> FolioResult<()>;
}

#[async_trait]
impl SessionAuthority for JwtManager {
    async fn sign_out(&self, session: &Session) -> FolioResult<()> {
        let token = session
            .token()
            .ok_or_else(|| FolioError::Unauthorized("No active session".to_string()))?;
        let claims = self.validate_token(token).await?;
        self.revoke(&claims).await;
        Ok(())
    }
}
