//! JWT token generation and validation
//!
//! Provides access and refresh token management with pre-computed keys
//! for optimal performance. The two token classes are signed with
//! different secrets, so a leaked access secret cannot forge refresh
//! tokens and vice versa.

use crate::auth::AuthError;
use crate::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Token class carried in the `token_type` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Optional display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Token class: access or refresh
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (fixed service identifier)
    pub iss: String,
    /// Audience (fixed consumer identifier)
    pub aud: String,
    /// JWT ID, unique per token; keeps two sessions issued in the same
    /// second from collapsing into one token string
    pub jti: String,
}

/// Identity payload supplied by the caller at issuance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
}

/// Pre-computed JWT keys for one token class
///
/// These are expensive to create, so they are built once at startup and
/// wrapped in Arc for cheap cloning.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from a secret; call once at startup
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

/// Token codec for issuing and verifying both token classes
///
/// Stateless beyond its keys and lifetimes: revocation is the registry's
/// concern, not the codec's.
#[derive(Clone)]
pub struct TokenCodec {
    access_keys: JwtKeys,
    refresh_keys: JwtKeys,
    access_token_expiry_secs: i64,
    refresh_token_expiry_secs: i64,
    issuer: String,
    audience: String,
    validation: Validation,
}

impl TokenCodec {
    /// Create a new codec with pre-computed keys for both token classes
    ///
    /// # Performance Note
    /// Call this once at application startup and store in AppState.
    /// Do NOT create per-request.
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Exact expiry boundary: no clock-skew tolerance.
        validation.leeway = 0;
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            access_keys: JwtKeys::new(&config.access_secret),
            refresh_keys: JwtKeys::new(&config.refresh_secret),
            access_token_expiry_secs: config.access_token_expiry_secs,
            refresh_token_expiry_secs: config.refresh_token_expiry_secs,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            validation,
        }
    }

    /// Issue an access token for the given identity
    #[inline]
    pub fn issue_access(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue(identity, TokenType::Access)
    }

    /// Issue a refresh token for the given identity
    #[inline]
    pub fn issue_refresh(&self, identity: &Identity) -> Result<String, AuthError> {
        self.issue(identity, TokenType::Refresh)
    }

    fn issue(&self, identity: &Identity, token_type: TokenType) -> Result<String, AuthError> {
        let (keys, expiry_secs) = self.class_params(token_type);
        let now = Utc::now();
        let exp = now + Duration::seconds(expiry_secs);

        let claims = Claims {
            sub: identity.user_id.clone(),
            email: identity.email.clone(),
            username: identity.username.clone(),
            token_type,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, keys.encoding()).map_err(|e| {
            AuthError::Internal(anyhow::anyhow!(
                "failed to sign {} token: {}",
                token_type,
                e
            ))
        })
    }

    /// Verify an access token and return its claims
    #[inline]
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenType::Access)
    }

    /// Verify a refresh token and return its claims
    #[inline]
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let (keys, _) = self.class_params(expected);

        let token_data = decode::<Claims>(token, keys.decoding(), &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            },
        )?;

        // Class claim must match the verification path even though the
        // secrets already differ per class.
        if token_data.claims.token_type != expected {
            return Err(AuthError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    fn class_params(&self, token_type: TokenType) -> (&JwtKeys, i64) {
        match token_type {
            TokenType::Access => (&self.access_keys, self.access_token_expiry_secs),
            TokenType::Refresh => (&self.refresh_keys, self.refresh_token_expiry_secs),
        }
    }

    /// Get access token expiry in seconds
    #[inline]
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtConfig;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret".to_string(),
            refresh_secret: "test-refresh-secret".to_string(),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604_800,
            issuer: "eventhub-api".to_string(),
            audience: "eventhub-client".to_string(),
        }
    }

    fn test_identity() -> Identity {
        Identity {
            user_id: "u1".to_string(),
            email: "a@b.com".to_string(),
            username: Some("alice".to_string()),
        }
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let codec = TokenCodec::new(&test_config());
        let token = codec.issue_access(&test_identity()).unwrap();
        let claims = codec.verify_access(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.iss, "eventhub-api");
        assert_eq!(claims.aud, "eventhub-client");
    }

    #[test]
    fn test_issue_and_verify_refresh_token() {
        let codec = TokenCodec::new(&test_config());
        let token = codec.issue_refresh(&test_identity()).unwrap();
        let claims = codec.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_access_token_rejected_on_refresh_path() {
        let codec = TokenCodec::new(&test_config());
        let token = codec.issue_access(&test_identity()).unwrap();

        assert!(matches!(
            codec.verify_refresh(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_rejected_on_access_path() {
        let codec = TokenCodec::new(&test_config());
        let token = codec.issue_refresh(&test_identity()).unwrap();

        assert!(matches!(
            codec.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_cross_secret_forgery_rejected() {
        // A codec whose access secret equals another codec's refresh secret
        // produces access tokens the other codec must reject.
        let codec = TokenCodec::new(&test_config());
        let mut forged_config = test_config();
        forged_config.access_secret = forged_config.refresh_secret.clone();
        let forger = TokenCodec::new(&forged_config);

        let forged = forger.issue_access(&test_identity()).unwrap();
        assert!(matches!(
            codec.verify_access(&forged),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        config.access_token_expiry_secs = -10;
        let codec = TokenCodec::new(&config);

        let token = codec.issue_access(&test_identity()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_token_expiring_in_one_second_passes() {
        let mut config = test_config();
        config.access_token_expiry_secs = 1;
        let codec = TokenCodec::new(&config);

        let token = codec.issue_access(&test_identity()).unwrap();
        assert!(codec.verify_access(&token).is_ok());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let codec = TokenCodec::new(&test_config());
        let mut other_config = test_config();
        other_config.issuer = "someone-else".to_string();
        let other = TokenCodec::new(&other_config);

        let token = other.issue_access(&test_identity()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let codec = TokenCodec::new(&test_config());
        let mut other_config = test_config();
        other_config.audience = "someone-else".to_string();
        let other = TokenCodec::new(&other_config);

        let token = other.issue_access(&test_identity()).unwrap();
        assert!(matches!(
            codec.verify_access(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let codec = TokenCodec::new(&test_config());
        assert!(matches!(
            codec.verify_access("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_same_identity_tokens_are_distinct() {
        let codec = TokenCodec::new(&test_config());
        let t1 = codec.issue_access(&test_identity()).unwrap();
        let t2 = codec.issue_access(&test_identity()).unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn test_token_type_wire_format() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
        assert_eq!(
            serde_json::from_str::<TokenType>("\"refresh\"").unwrap(),
            TokenType::Refresh
        );
    }

    #[test]
    fn test_codec_clone_is_cheap() {
        let codec = TokenCodec::new(&test_config());
        let cloned = codec.clone();

        let token = codec.issue_access(&test_identity()).unwrap();
        assert!(cloned.verify_access(&token).is_ok());
    }
}
