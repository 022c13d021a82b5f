use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque, single-use authorization code handed to the relying party.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorizationCode(String);

impl AuthorizationCode {
    pub fn new(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorizationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity claims bound to an authorization code until it is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClaims {
    /// Client that started the flow. Becomes the ID token audience.
    pub client_id: String,
    pub subject: String,
    pub family_name: String,
    pub given_name: String,
    /// Echoed from the authorization request.
    pub state: Option<String>,
    /// Echoed from the authorization request into the ID token.
    pub nonce: Option<String>,
    /// Correlation value for a federated (GovSSO) login step.
    pub govsso_login_challenge: Option<String>,
    /// Redirect URI of the originating request, checked again at the token endpoint.
    pub redirect_uri: String,
    pub issued_at: DateTime<Utc>,
}
