//! Typed runtime configuration.
//!
//! Composed by [`loader::ConfigLoader`] from defaults, an optional TOML
//! file, and environment overrides, in that order.

pub mod loader;

use std::path::PathBuf;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};

/// Placeholder secret; the loader warns loudly whenever it is in effect.
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// Default access token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    /// Relaxes CORS and keeps logs verbose. Never enable in production.
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Exact origins allowed outside dev mode; empty means same-origin
    /// clients only.
    pub allowed_origins: Vec<String>,
}

/// Where the composed configuration actually came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub env_file_loaded: bool,
    pub config_path: Option<PathBuf>,
}

/// Non-fatal findings collected while composing the configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(
        &mut self,
        message: impl Into<String>,
        hint: Option<&str>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: hint.map(str::to_string),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

/// Reject anything that is not a PostgreSQL connection string.
pub fn validate_database_url(url: &str) -> Result<(), ConfigLoadError> {
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(())
    } else {
        Err(ConfigLoadError::InvalidDatabaseUrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_product() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_ttl_secs, 7 * 24 * 60 * 60);
        assert!(!config.dev_mode);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn only_postgres_urls_pass_validation() {
        assert!(validate_database_url("postgres://u:p@localhost/tomati").is_ok());
        assert!(
            validate_database_url("postgresql://u:p@localhost/tomati").is_ok()
        );
        assert!(validate_database_url("mysql://u:p@localhost/tomati").is_err());
    }
}
