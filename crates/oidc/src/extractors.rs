//! Axum extractors for token endpoint client identification.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::TokenError;

/// Client id presented with HTTP Basic credentials (`client_secret_basic`).
///
/// `None` when the request has no `Authorization` header or uses another
/// scheme. The secret is accepted without verification; the client id is only
/// matched against the one bound to the authorization code.
pub struct BasicClientId(pub Option<String>);

impl<S> FromRequestParts<S> for BasicClientId
where
    S: Send + Sync,
{
    type Rejection = TokenError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(BasicClientId(None));
        };

        let invalid = || TokenError::InvalidClient("malformed Basic credentials".to_string());

        let value = header.to_str().map_err(|_| invalid())?;
        let encoded = match value.split_once(' ') {
            Some((scheme, encoded)) if scheme.eq_ignore_ascii_case("Basic") => encoded,
            _ => return Ok(BasicClientId(None)),
        };
        let decoded = STANDARD.decode(encoded.trim()).map_err(|_| invalid())?;
        let credentials = String::from_utf8(decoded).map_err(|_| invalid())?;

        // RFC 6749 2.3.1: the client id is form-urlencoded before encoding.
        let raw_id = credentials.split(':').next().unwrap_or_default();
        let client_id = urlencoding::decode(raw_id).map_err(|_| invalid())?;

        if client_id.is_empty() {
            return Err(invalid());
        }

        Ok(BasicClientId(Some(client_id.into_owned())))
    }
}
