//! Authentication error taxonomy
//!
//! The two token variants deliberately share one display message: callers
//! (and therefore clients) must not be able to distinguish an expired token
//! from a forged or revoked one. The variants stay separate so the service
//! can log the real cause.

use thiserror::Error;

/// Failures produced by the authentication core
#[derive(Debug, Error)]
pub enum AuthError {
    /// Password did not match the stored hash, or the hash was unusable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Forged signature, wrong issuer/audience, wrong token class, or
    /// blacklisted token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token was cryptographically valid but past its expiry. Collapsed
    /// into the same external message as `InvalidToken`.
    #[error("invalid or expired token")]
    ExpiredToken,

    /// Revocation store or signing failure; never caused by client input.
    #[error("authentication backend failure")]
    Internal(#[from] anyhow::Error),
}
