use std::time::Duration;

/// Default ID token lifetime.
pub const DEFAULT_ID_TOKEN_TTL: Duration = Duration::from_secs(600);

/// Default lifetime of an unredeemed authorization code.
pub const DEFAULT_CODE_TTL: Duration = Duration::from_secs(600);

/// Runtime settings for the OIDC endpoints.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer identifier, without a trailing slash. Used for `iss` and to
    /// build the discovery document's endpoint URLs.
    pub issuer: String,
    pub id_token_ttl: Duration,
    /// `None` keeps unredeemed codes for the life of the process.
    pub code_ttl: Option<Duration>,
}

impl OidcConfig {
    pub fn new(issuer: impl Into<String>) -> Self {
        let issuer: String = issuer.into();
        Self {
            issuer: issuer.trim_end_matches('/').to_string(),
            id_token_ttl: DEFAULT_ID_TOKEN_TTL,
            code_ttl: Some(DEFAULT_CODE_TTL),
        }
    }

    /// Absolute URL of an endpoint path under the issuer.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.issuer, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_trailing_slash_is_trimmed() {
        let config = OidcConfig::new("https://localhost:8080/");
        assert_eq!(config.issuer, "https://localhost:8080");
    }

    #[test]
    fn test_endpoint_keeps_issuer_path() {
        let config = OidcConfig::new("https://example.com/tara");
        assert_eq!(
            config.endpoint("/oidc/token"),
            "https://example.com/tara/oidc/token"
        );
    }
}
