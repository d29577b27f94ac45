//! Application state management
//!
//! Shared state passed to request handlers via Axum's state extraction.
//! All fields are cheap to clone: the codec holds Arc'd keys and the
//! revocation store is shared behind an Arc.

use crate::auth::{AuthService, InMemoryRevocationStore, RevocationStore, TokenCodec};
use crate::config::AppConfig;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Authentication service with pre-computed signing keys
    pub auth: AuthService,
}

impl AppState {
    /// Create state backed by the in-memory revocation store
    ///
    /// Pre-computes the JWT keys from the configured secrets; call once
    /// at application startup.
    pub fn new(config: AppConfig) -> Self {
        Self::with_store(config, Arc::new(InMemoryRevocationStore::new()))
    }

    /// Create state with an injected revocation store
    ///
    /// Lets tests use isolated registries and deployments swap in a
    /// persistent backend.
    pub fn with_store(config: AppConfig, store: Arc<dyn RevocationStore>) -> Self {
        let codec = TokenCodec::new(&config.jwt);
        Self {
            config: Arc::new(config),
            auth: AuthService::new(codec, store),
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the authentication service
    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}
