//! OpenID Provider metadata served at `/.well-known/openid-configuration`.

use serde::Serialize;

use crate::config::OidcConfig;
use crate::token::ID_TOKEN_ALGORITHM_NAME;

#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub scopes_supported: Vec<&'static str>,
    pub response_types_supported: Vec<&'static str>,
    pub grant_types_supported: Vec<&'static str>,
    pub subject_types_supported: Vec<&'static str>,
    pub id_token_signing_alg_values_supported: Vec<&'static str>,
    pub token_endpoint_auth_methods_supported: Vec<&'static str>,
    pub claims_supported: Vec<&'static str>,
}

impl ProviderMetadata {
    pub fn new(config: &OidcConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            authorization_endpoint: config.endpoint("/oidc/authorize"),
            token_endpoint: config.endpoint("/oidc/token"),
            jwks_uri: config.endpoint("/oidc/jwks"),
            scopes_supported: vec!["openid"],
            response_types_supported: vec!["code"],
            grant_types_supported: vec!["authorization_code"],
            subject_types_supported: vec!["public"],
            id_token_signing_alg_values_supported: vec![ID_TOKEN_ALGORITHM_NAME],
            token_endpoint_auth_methods_supported: vec![
                "client_secret_basic",
                "client_secret_post",
            ],
            claims_supported: vec![
                "iss",
                "sub",
                "aud",
                "exp",
                "iat",
                "nbf",
                "auth_time",
                "jti",
                "nonce",
                "given_name",
                "family_name",
            ],
        }
    }
}
