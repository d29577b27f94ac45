//! Authentication service
//!
//! Composes the token codec and the revocation store into the operations
//! route middleware consumes: issue pair, verify bearer, refresh, logout,
//! logout-all. The blacklist is checked before any cryptography, and all
//! token failures surface as one uniform error.

use crate::auth::{AuthError, Claims, Identity, RevocationStore, TokenCodec};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Token pair returned on login, registration, and refresh
#[derive(Debug, Clone, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Authentication façade
///
/// Cheap to clone: the codec holds Arc'd keys and the store is shared.
/// The store is injected so tests get isolated registries and a
/// persistent backend can be swapped in.
#[derive(Clone)]
pub struct AuthService {
    codec: TokenCodec,
    store: Arc<dyn RevocationStore>,
}

impl AuthService {
    pub fn new(codec: TokenCodec, store: Arc<dyn RevocationStore>) -> Self {
        Self { codec, store }
    }

    /// Issue a fresh access/refresh pair and register both tokens as
    /// active for the user
    ///
    /// The caller must have already verified the identity (password check
    /// or OAuth lookup); this core never queries a user store itself.
    pub async fn issue_token_pair(&self, identity: &Identity) -> Result<AuthTokens, AuthError> {
        let access_token = self.codec.issue_access(identity)?;
        let refresh_token = self.codec.issue_refresh(identity)?;

        self.store
            .track_for_user(&identity.user_id, &access_token)
            .await?;
        self.store
            .track_for_user(&identity.user_id, &refresh_token)
            .await?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.codec.access_token_expiry_secs(),
        })
    }

    /// Verify a bearer access token and return its claims
    ///
    /// Blacklist lookup runs first (cheap, no crypto); a blacklisted token
    /// fails exactly like a forged one, so callers cannot probe revocation
    /// state.
    pub async fn verify_bearer_token(&self, token: &str) -> Result<Claims, AuthError> {
        if self.store.is_blacklisted(token).await? {
            debug!("rejected blacklisted access token");
            return Err(AuthError::InvalidToken);
        }

        match self.codec.verify_access(token) {
            Ok(claims) => Ok(claims),
            Err(AuthError::ExpiredToken) => {
                debug!("rejected expired access token");
                Err(AuthError::ExpiredToken)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchange a refresh token for a brand-new token pair
    ///
    /// The presented refresh token is NOT revoked on rotation; it stays
    /// usable until it expires or the session is logged out.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, AuthError> {
        if self.store.is_blacklisted(refresh_token).await? {
            debug!("rejected blacklisted refresh token");
            return Err(AuthError::InvalidToken);
        }

        let claims = self.codec.verify_refresh(refresh_token)?;
        let identity = Identity {
            user_id: claims.sub,
            email: claims.email,
            username: claims.username,
        };

        self.issue_token_pair(&identity).await
    }

    /// Log out a single session by revoking its tokens
    pub async fn logout(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), AuthError> {
        self.store
            .blacklist_user_tokens(user_id, access_token, refresh_token)
            .await?;
        debug!(user_id, "session logged out");
        Ok(())
    }

    /// Revoke every active token for the user ("log out everywhere")
    pub async fn logout_all(&self, user_id: &str) -> Result<(), AuthError> {
        self.store.blacklist_all_for_user(user_id).await?;
        debug!(user_id, "all sessions logged out");
        Ok(())
    }
}
