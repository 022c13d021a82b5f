use chrono::{DateTime, Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use url::Url;

use super::{AuthorizationCode, AuthorizeErrorCode, PendingClaims};

/// Number of alphanumeric characters in an authorization code (~190 bits).
pub const CODE_LENGTH: usize = 32;

/// Generate a cryptographically random authorization code.
pub fn generate_code() -> AuthorizationCode {
    let code: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect();
    AuthorizationCode::new(code)
}

/// Check whether pending claims have outlived the code TTL.
///
/// A TTL reaching past the representable date range never expires.
pub fn is_code_expired(claims: &PendingClaims, ttl: Duration, now: DateTime<Utc>) -> bool {
    claims
        .issued_at
        .checked_add_signed(ttl)
        .is_some_and(|deadline| deadline <= now)
}

/// Build the successful authorization response URL.
///
/// Existing query parameters of the redirect URI are preserved.
pub fn success_redirect_url(
    redirect_uri: &Url,
    code: &AuthorizationCode,
    state: Option<&str>,
) -> Url {
    let mut url = redirect_uri.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("code", code.as_str());
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }
    url
}

/// Build an OAuth 2.0 error response URL.
pub fn error_redirect_url(
    redirect_uri: &Url,
    error: AuthorizeErrorCode,
    description: &str,
    state: Option<&str>,
) -> Url {
    let mut url = redirect_uri.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs
            .append_pair("error", error.as_str())
            .append_pair("error_description", description);
        if let Some(state) = state {
            pairs.append_pair("state", state);
        }
    }
    url
}
