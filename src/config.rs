//! Configuration module for Folio Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

use crate::auth::ConfiguredUser;
use crate::sync::ConflictPolicy;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Maximum pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Admin authentication configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Whether admin routes require a JWT.
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_duration_hours: i64,
    /// Admin users allowed to sign in.
    #[serde(default)]
    pub users: Vec<ConfiguredUser>,
}

fn default_true() -> bool {
    true
}

/// Contact form email relay configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// When disabled, contact submissions are logged and dropped.
    pub enabled: bool,
    /// Relay send endpoint.
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    /// Public client key for the relay account.
    pub public_key: String,
    pub timeout_secs: u64,
}

/// Admin dashboard sync behavior.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Delay after re-enabling the network before reloading, in milliseconds.
    pub settle_delay_ms: u64,
    /// How long the dashboard waits for the store to answer a ping when it connects.
    pub connect_timeout_ms: u64,
    /// What the overwrite fallback does when the stored copy changed underneath.
    pub conflict_policy: ConflictPolicy,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FOLIO__*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with FOLIO__ prefix
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_issuer: "folio-core".to_string(),
            token_duration_hours: 12,
            users: Vec::new(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000,
            connect_timeout_ms: 3000,
            conflict_policy: ConflictPolicy::LastWriteWins,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sections() {
        let relay = RelayConfig::default();
        assert!(!relay.enabled);
        assert!(relay.endpoint.starts_with("https://"));

        let sync = SyncConfig::default();
        assert_eq!(sync.settle_delay_ms, 1000);
        assert_eq!(sync.connect_timeout_ms, 3000);
        assert_eq!(sync.conflict_policy, ConflictPolicy::LastWriteWins);

        let auth = AuthConfig::default();
        assert!(auth.enabled);
        assert!(auth.users.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_yaml() {
        let config: Config = ConfigLoader::builder()
            .add_source(File::from_str(
                r#"
server:
  host: 127.0.0.1
  port: 8080
database:
  url: "sqlite::memory:"
sync:
  settle_delay_ms: 0
  conflict_policy: reject_stale
"#,
                config::FileFormat::Yaml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.sync.conflict_policy, ConflictPolicy::RejectStale);
        assert_eq!(config.sync.connect_timeout_ms, 3000);
        assert!(config.auth.enabled);
    }
}
