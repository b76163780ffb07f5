//! JWT authentication for admin users.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{FolioError, FolioResult};

/// JWT claims for authenticated users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// User email.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
    /// Issuer.
    pub iss: String,
    /// Token ID, used for sign-out revocation.
    pub jti: String,
}

/// User roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Can read the store but not change it.
    Viewer,
    /// Full access to projects and skills.
    Admin,
}

impl UserRole {
    /// Check if this role may write documents.
    pub fn can_write(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    /// Token validity duration in hours.
    token_duration_hours: i64,
    /// Signed-out token IDs mapped to the token's expiry. Entries are
    /// dropped once the token would have expired anyway.
    revoked: Arc<RwLock<HashMap<String, i64>>>,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret.
    pub fn new(secret: &str, issuer: String, token_duration_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            token_duration_hours,
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get token duration in hours.
    pub fn token_duration_hours(&self) -> i64 {
        self.token_duration_hours
    }

    /// Generate a JWT token for a user.
    pub fn generate_token(&self, user_id: &str, email: &str, role: UserRole) -> FolioResult<String> {
        let now = Utc::now();
        let exp = now + Duration::hours(self.token_duration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| FolioError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a JWT token, rejecting signed-out tokens.
    pub async fn validate_token(&self, token: &str) -> FolioResult<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data: TokenData<Claims> =
            decode(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "JWT validation failed");
                FolioError::Unauthorized(format!("Invalid token: {}", e))
            })?;

        if self.revoked.read().await.contains_key(&token_data.claims.jti) {
            return Err(FolioError::Unauthorized("Token has been signed out".to_string()));
        }

        Ok(token_data.claims)
    }

    /// Revoke a token so later validation fails.
    pub async fn revoke(&self, claims: &Claims) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, exp| *exp > now);
        if claims.exp > now {
            revoked.insert(claims.jti.clone(), claims.exp);
        }
        tracing::info!(user_id = %claims.sub, revoked = revoked.len(), "Session revoked");
    }

    #[cfg(test)]
    async fn revoked_count(&self) -> usize {
        self.revoked.read().await.len()
    }
}

/// Configured admin user from config file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ConfiguredUser {
    /// User ID.
    pub id: String,
    /// User email.
    pub email: String,
    /// Password hash (SHA256 hex).
    pub password_hash: String,
    /// User role.
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::Admin
}

impl ConfiguredUser {
    /// Verify a password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        hash_password(password) == self.password_hash
    }
}

/// SHA256 hex digest used for configured password hashes.
pub fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Admin users loaded from configuration.
#[derive(Clone)]
pub struct UserStore {
    users: std::collections::HashMap<String, ConfiguredUser>,
}

impl UserStore {
    /// Create a new user store from configured users.
    pub fn new(users: Vec<ConfiguredUser>) -> Self {
        let users = users
            .into_iter()
            .map(|u| (u.email.to_lowercase(), u))
            .collect();
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Find a user by email.
    pub fn find_by_email(&self, email: &str) -> Option<&ConfiguredUser> {
        self.users.get(&email.to_lowercase())
    }

    /// Authenticate a user with email and password.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<&ConfiguredUser> {
        self.find_by_email(email)
            .filter(|user| user.verify_password(password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret-key-12345", "folio-core".to_string(), 24)
    }

    #[tokio::test]
    async fn test_jwt_roundtrip() {
        let manager = manager();

        let token = manager
            .generate_token("user-1", "admin@example.com", UserRole::Admin)
            .unwrap();

        let claims = manager.validate_token(&token).await.unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let manager = manager();
        let token = manager
            .generate_token("user-1", "admin@example.com", UserRole::Admin)
            .unwrap();
        let other = manager
            .generate_token("user-1", "admin@example.com", UserRole::Admin)
            .unwrap();

        let claims = manager.validate_token(&token).await.unwrap();
        manager.revoke(&claims).await;

        assert!(matches!(
            manager.validate_token(&token).await,
            Err(FolioError::Unauthorized(_))
        ));
        // Other sessions of the same user stay valid.
        assert!(manager.validate_token(&other).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_revocations_are_pruned() {
        let manager = manager();
        let token = manager
            .generate_token("user-1", "admin@example.com", UserRole::Admin)
            .unwrap();
        let live = manager.validate_token(&token).await.unwrap();

        let stale = Claims {
            exp: Utc::now().timestamp() - 60,
            jti: "old-session".to_string(),
            ..live.clone()
        };
        manager.revoked.write().await.insert(stale.jti.clone(), stale.exp);
        assert_eq!(manager.revoked_count().await, 1);

        manager.revoke(&live).await;
        assert_eq!(manager.revoked_count().await, 1);
        assert!(manager.validate_token(&token).await.is_err());

        // An already expired token is never stored.
        manager.revoke(&stale).await;
        assert_eq!(manager.revoked_count().await, 1);
    }

    #[tokio::test]
    async fn test_wrong_issuer_rejected() {
        let token = JwtManager::new("test-secret-key-12345", "someone-else".to_string(), 1)
            .generate_token("user-1", "a@example.com", UserRole::Viewer)
            .unwrap();
        assert!(manager().validate_token(&token).await.is_err());
    }

    #[test]
    fn test_user_authentication() {
        let users = vec![ConfiguredUser {
            id: "user-1".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hash_password("password123"),
            role: UserRole::Admin,
        }];

        let store = UserStore::new(users);

        // Valid credentials, email case does not matter
        assert!(store.authenticate("Admin@Example.com", "password123").is_some());

        // Wrong password
        assert!(store.authenticate("admin@example.com", "wrong").is_none());

        // Unknown user
        assert!(store.authenticate("unknown@example.com", "password123").is_none());
    }

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_write());
        assert!(!UserRole::Viewer.can_write());
    }
}
