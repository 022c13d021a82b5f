//! In-memory claims storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use taramock_core::flow::{
    is_code_expired, AuthorizationCode, ClaimsRepository, FlowError, PendingClaims, Result,
};

/// In-memory store mapping authorization codes to pending claims.
///
/// `put` and `take` both hold the write lock, so a take is a single
/// critical section: racing redemptions of one code see exactly one hit.
///
/// With a code TTL configured, expired entries are never handed out and are
/// purged on the next insert.
#[derive(Debug, Clone)]
pub struct ClaimsStore {
    pending: Arc<RwLock<HashMap<AuthorizationCode, PendingClaims>>>,
    code_ttl: Option<Duration>,
}

impl Default for ClaimsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimsStore {
    /// Creates an empty store whose codes never expire.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
            code_ttl: None,
        }
    }

    /// Creates an empty store whose codes expire after `ttl`.
    pub fn with_code_ttl(ttl: Duration) -> Self {
        Self {
            pending: Arc::new(RwLock::new(HashMap::new())),
            code_ttl: Some(ttl),
        }
    }
}

#[async_trait]
impl ClaimsRepository for ClaimsStore {
    async fn put(&self, code: &AuthorizationCode, claims: PendingClaims) -> Result<()> {
        let mut pending = self.pending.write().await;

        if let Some(ttl) = self.code_ttl {
            let now = Utc::now();
            let before = pending.len();
            pending.retain(|_, c| !is_code_expired(c, ttl, now));
            let purged = before - pending.len();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired authorization codes");
            }
        }

        if pending.contains_key(code) {
            tracing::warn!("Authorization code collision, refusing to overwrite");
            return Err(FlowError::CodeCollision);
        }

        pending.insert(code.clone(), claims);
        Ok(())
    }

    async fn take(&self, code: &AuthorizationCode) -> Result<Option<PendingClaims>> {
        let mut pending = self.pending.write().await;
        let claims = pending.remove(code);

        match (claims, self.code_ttl) {
            (Some(claims), Some(ttl)) if is_code_expired(&claims, ttl, Utc::now()) => {
                tracing::debug!(client_id = %claims.client_id, "Authorization code expired");
                Ok(None)
            }
            (claims, _) => Ok(claims),
        }
    }

    async fn pending_count(&self) -> Result<usize> {
        let pending = self.pending.read().await;
        Ok(pending.len())
    }
}
