//! Token revocation registry
//!
//! Tracks which issued tokens are no longer valid and which active tokens
//! belong to which user, supporting single-session logout and
//! "log out everywhere".
//!
//! The store is a trait so a persistent backend (e.g. Redis with TTLs)
//! can replace the in-memory variant without touching call sites. The
//! in-memory variant loses all state on restart: previously blacklisted
//! tokens become valid again until they expire naturally.

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

/// Revocation capability consulted on every verify and logout
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Whether the token has been explicitly revoked
    async fn is_blacklisted(&self, token: &str) -> Result<bool>;

    /// Record a freshly issued token as active for the user
    async fn track_for_user(&self, user_id: &str, token: &str) -> Result<()>;

    /// Revoke a single token; idempotent
    async fn blacklist_token(&self, token: &str) -> Result<()>;

    /// Revoke the given session tokens and drop them from the user's
    /// active set
    async fn blacklist_user_tokens(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<()>;

    /// Revoke every token currently tracked for the user
    async fn blacklist_all_for_user(&self, user_id: &str) -> Result<()>;
}

#[derive(Default)]
struct RegistryState {
    /// Tokens rejected regardless of cryptographic validity
    blacklist: HashSet<String>,
    /// Active (non-blacklisted) tokens per user
    active_by_user: HashMap<String, HashSet<String>>,
}

impl RegistryState {
    /// Blacklist one token and remove it from the user's active set,
    /// dropping the user entry once its set is empty.
    fn blacklist_for_user(&mut self, user_id: &str, token: &str) {
        self.blacklist.insert(token.to_string());
        if let Some(active) = self.active_by_user.get_mut(user_id) {
            active.remove(token);
            if active.is_empty() {
                self.active_by_user.remove(user_id);
            }
        }
    }
}

/// Process-lifetime, in-memory revocation store
///
/// Blacklist entries accumulate for the lifetime of the process; there is
/// no expiry-based cleanup. Shared mutable state behind a single RwLock,
/// since concurrent login (write) and verify (read) for the same user is
/// the normal pattern on a multi-threaded runtime.
#[derive(Default)]
pub struct InMemoryRevocationStore {
    state: RwLock<RegistryState>,
}

impl InMemoryRevocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn is_blacklisted(&self, token: &str) -> Result<bool> {
        Ok(self.state.read().blacklist.contains(token))
    }

    async fn track_for_user(&self, user_id: &str, token: &str) -> Result<()> {
        self.state
            .write()
            .active_by_user
            .entry(user_id.to_string())
            .or_default()
            .insert(token.to_string());
        Ok(())
    }

    async fn blacklist_token(&self, token: &str) -> Result<()> {
        self.state.write().blacklist.insert(token.to_string());
        Ok(())
    }

    async fn blacklist_user_tokens(
        &self,
        user_id: &str,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write();
        state.blacklist_for_user(user_id, access_token);
        if let Some(refresh) = refresh_token {
            state.blacklist_for_user(user_id, refresh);
        }
        Ok(())
    }

    async fn blacklist_all_for_user(&self, user_id: &str) -> Result<()> {
        let mut state = self.state.write();
        if let Some(active) = state.active_by_user.remove(user_id) {
            state.blacklist.extend(active);
        }
        Ok(())
    }
}
