use async_trait::async_trait;

use super::{AuthorizationCode, FlowError, PendingClaims};

/// Result type for authorization flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Storage for claims waiting on their authorization code.
///
/// Implementations must make `take` atomic: of any number of concurrent
/// callers presenting the same code, at most one receives the claims.
#[async_trait]
pub trait ClaimsRepository: Send + Sync {
    /// Store claims under a fresh code.
    ///
    /// Fails with `FlowError::CodeCollision` if the code is already pending;
    /// an existing entry is never overwritten.
    async fn put(&self, code: &AuthorizationCode, claims: PendingClaims) -> Result<()>;

    /// Retrieve and delete the claims for a code in one step.
    ///
    /// Returns `None` for unknown, already redeemed, or expired codes.
    async fn take(&self, code: &AuthorizationCode) -> Result<Option<PendingClaims>>;

    /// Number of codes currently pending redemption.
    async fn pending_count(&self) -> Result<usize>;
}
