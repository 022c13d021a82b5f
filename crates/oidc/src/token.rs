//! ID token construction and signing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, Header};
use serde::{Deserialize, Serialize};
use taramock_core::flow::PendingClaims;

use crate::jwks::Jwks;
use crate::keys::SigningKeys;

/// Signature algorithm for ID tokens.
pub const ID_TOKEN_ALGORITHM: Algorithm = Algorithm::RS256;

/// JOSE name of [`ID_TOKEN_ALGORITHM`].
pub const ID_TOKEN_ALGORITHM_NAME: &str = "RS256";

/// Claims carried by an ID token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub sub: String,
    /// Client id of the relying party that started the flow.
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
    /// When the simulated user "authenticated", i.e. when the code was issued.
    pub auth_time: i64,
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    pub given_name: String,
    pub family_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub govsso_login_challenge: Option<String>,
}

impl IdTokenClaims {
    /// Builds the claim set for redeemed pending claims.
    pub fn from_pending(
        pending: &PendingClaims,
        issuer: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let iat = now.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            iss: issuer.to_string(),
            sub: pending.subject.clone(),
            aud: pending.client_id.clone(),
            exp: iat.saturating_add(ttl_secs),
            iat,
            nbf: iat,
            auth_time: pending.issued_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            nonce: pending.nonce.clone(),
            given_name: pending.given_name.clone(),
            family_name: pending.family_name.clone(),
            govsso_login_challenge: pending.govsso_login_challenge.clone(),
        }
    }
}

/// A freshly signed ID token.
#[derive(Debug)]
pub struct IssuedIdToken {
    pub token: String,
    pub expires_in: u64,
    pub claims: IdTokenClaims,
}

/// Signs ID tokens with the loaded key pair.
///
/// Read-only after construction and shared across request tasks.
#[derive(Debug)]
pub struct TokenSigner {
    keys: SigningKeys,
    issuer: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(keys: SigningKeys, issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            ttl,
        }
    }

    /// Builds and signs the ID token for redeemed claims.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn issue(
        &self,
        pending: &PendingClaims,
    ) -> Result<IssuedIdToken, jsonwebtoken::errors::Error> {
        let claims = IdTokenClaims::from_pending(pending, &self.issuer, Utc::now(), self.ttl);
        let token = self.sign(&claims)?;

        tracing::debug!(
            sub = %claims.sub,
            aud = %claims.aud,
            exp = claims.exp,
            jti = %claims.jti,
            "Signed ID token"
        );

        Ok(IssuedIdToken {
            token,
            expires_in: u64::try_from(claims.exp - claims.iat).unwrap_or_default(),
            claims,
        })
    }

    /// Signs a claim set, tagging the header with the published key id.
    pub fn sign(&self, claims: &IdTokenClaims) -> Result<String, jsonwebtoken::errors::Error> {
        let mut header = Header::new(ID_TOKEN_ALGORITHM);
        header.kid = Some(self.keys.kid().to_string());

        encode(&header, claims, self.keys.encoding_key())
    }

    /// Key set containing the verification key.
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: vec![self.keys.to_jwk()],
        }
    }

    pub fn kid(&self) -> &str {
        self.keys.kid()
    }
}
