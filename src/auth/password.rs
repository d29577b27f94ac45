//! Password hashing using PBKDF2-HMAC-SHA256
//!
//! Stored format is base64(salt || derived-key): a random 16-byte salt
//! followed by a 32-byte key derived with 100,000 iterations.
//!
//! # Performance Considerations
//!
//! The iteration count makes each call cost on the order of 100ms by
//! design. For async contexts use the `_async` variants, which run on
//! the blocking thread pool.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::error;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const ITERATIONS: u32 = 100_000;

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password (blocking operation)
    ///
    /// # Performance Note
    /// This is CPU-intensive. For async contexts, use `hash_async`.
    pub fn hash(password: &str) -> Result<String> {
        let mut buf = [0u8; SALT_LEN + KEY_LEN];
        OsRng.try_fill_bytes(&mut buf[..SALT_LEN])?;

        let (salt, key) = buf.split_at_mut(SALT_LEN);
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATIONS, key);

        Ok(BASE64.encode(buf))
    }

    /// Hash a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool,
    /// preventing it from blocking the async runtime.
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// Returns false for any malformed stored hash; verification never
    /// fails with an error, it only rejects. The comparison is
    /// constant-time over the derived key.
    pub fn verify(password: &str, encoded: &str) -> bool {
        let decoded = match BASE64.decode(encoded) {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        if decoded.len() != SALT_LEN + KEY_LEN {
            return false;
        }

        let (salt, stored_key) = decoded.split_at(SALT_LEN);
        let mut derived = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATIONS, &mut derived);

        derived.ct_eq(stored_key).into()
    }

    /// Verify a password asynchronously (non-blocking)
    ///
    /// Spawns the CPU-intensive work on a blocking thread pool.
    pub async fn verify_async(password: String, encoded: String) -> bool {
        match tokio::task::spawn_blocking(move || Self::verify(&password, &encoded)).await {
            Ok(valid) => valid,
            Err(e) => {
                error!("password verification task failed: {}", e);
                false
            }
        }
    }
}
