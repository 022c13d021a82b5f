//! Shared state for the OIDC handlers.

use std::sync::Arc;

use chrono::Duration;
use taramock_core::flow::ClaimsRepository;
use taramock_core::identity::IdentityCatalog;

use crate::config::OidcConfig;
use crate::keys::SigningKeys;
use crate::store::ClaimsStore;
use crate::token::TokenSigner;

/// State shared by the OIDC handlers.
///
/// The claims repository is the only mutable part; everything else is
/// read-only after startup.
#[derive(Clone)]
pub struct OidcState {
    pub claims: Arc<dyn ClaimsRepository>,
    pub signer: Arc<TokenSigner>,
    pub identities: Arc<IdentityCatalog>,
    pub config: OidcConfig,
}

impl OidcState {
    /// Creates the state with an in-memory claims store honouring `config.code_ttl`.
    pub fn new(config: OidcConfig, keys: SigningKeys, identities: IdentityCatalog) -> Self {
        // A TTL too large for a chrono duration behaves as no expiry.
        let store = match config.code_ttl.and_then(|ttl| Duration::from_std(ttl).ok()) {
            Some(ttl) => ClaimsStore::with_code_ttl(ttl),
            None => ClaimsStore::new(),
        };

        Self {
            claims: Arc::new(store),
            signer: Arc::new(TokenSigner::new(
                keys,
                config.issuer.clone(),
                config.id_token_ttl,
            )),
            identities: Arc::new(identities),
            config,
        }
    }

    /// Replaces the claims repository.
    pub fn with_claims_repository(mut self, claims: Arc<dyn ClaimsRepository>) -> Self {
        self.claims = claims;
        self
    }
}
