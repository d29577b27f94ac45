//! Authentication module
//!
//! Provides JWT-based authentication with PBKDF2 password hashing and an
//! in-memory token revocation registry.

mod error;
mod jwt;
mod middleware;
mod password;
mod revocation;
mod service;

pub use error::AuthError;
pub use jwt::{Claims, Identity, JwtKeys, TokenCodec, TokenType};
pub use middleware::{auth_middleware, AuthUser};
pub use password::PasswordService;
pub use revocation::{InMemoryRevocationStore, RevocationStore};
pub use service::{AuthService, AuthTokens};
