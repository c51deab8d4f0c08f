use std::sync::Arc;
use std::time::Duration;

use mini_moka::sync::Cache;

use crate::AuthError;
use crate::token::{fingerprint, sha256_hex};

/// Invalidates authenticated sessions by token
///
/// Implementations must be safe to share across concurrent requests and
/// handle their own internal synchronization.
pub trait SessionAuthority: Send + Sync {
    /// Destroy the session identified by `token`
    ///
    /// Returns `Ok(true)` when a matching session existed and was removed.
    /// An absent or unknown token yields `Ok(false)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` only when the backing storage fails
    fn invalidate(&self, token: Option<&str>) -> Result<bool, AuthError>;
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// User the session belongs to
    pub username: String,
}

/// In-memory session registry
///
/// Sessions expire after sitting idle for the configured timeout. Entries
/// are keyed by the SHA-256 digest of the token so raw tokens are never
/// held in the cache.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Arc<Session>>,
}

impl SessionStore {
    /// Create a store whose sessions expire after `idle_timeout` of inactivity
    pub fn new(idle_timeout: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_idle(idle_timeout)
            .max_capacity(capacity)
            .build();

        Self { cache }
    }

    /// Register a session under `token`, replacing any existing one
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MalformedToken` if the token is empty
    pub fn insert(&self, token: &str, session: Session) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        tracing::debug!(token = %fingerprint(token), username = %session.username, "registered session");
        self.cache.insert(sha256_hex(token), Arc::new(session));
        Ok(())
    }

    /// Look up the session for `token`, refreshing its idle timer
    pub fn get(&self, token: &str) -> Option<Arc<Session>> {
        self.cache.get(&sha256_hex(token))
    }
}

impl SessionAuthority for SessionStore {
    fn invalidate(&self, token: Option<&str>) -> Result<bool, AuthError> {
        let Some(token) = token else {
            return Ok(false);
        };

        let key = sha256_hex(token);
        if self.cache.get(&key).is_none() {
            return Ok(false);
        }

        self.cache.invalidate(&key);
        Ok(true)
    }
}
