//! Configuration management for the EventHub authentication core
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: EVENTHUB__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub jwt: JwtConfig,
}

/// JWT configuration
///
/// Access and refresh tokens are signed with different secrets so a leaked
/// access-token secret cannot forge refresh tokens, and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
    pub issuer: String,
    pub audience: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig {
                // Insecure fallbacks for development only; deployments must
                // override these via config file or environment.
                access_secret: "dev-access-secret-change-in-production".to_string(),
                refresh_secret: "dev-refresh-secret-change-in-production".to_string(),
                access_token_expiry_secs: 900,       // 15 minutes
                refresh_token_expiry_secs: 604_800,  // 7 days
                issuer: "eventhub-api".to_string(),
                audience: "eventhub-client".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with EVENTHUB__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., EVENTHUB__JWT__ACCESS_SECRET sets jwt.access_secret
            .add_source(config::Environment::with_prefix("EVENTHUB").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.jwt.access_token_expiry_secs, 900);
        assert_eq!(config.jwt.refresh_token_expiry_secs, 604_800);
        assert_ne!(config.jwt.access_secret, config.jwt.refresh_secret);
        assert_eq!(config.jwt.issuer, "eventhub-api");
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
