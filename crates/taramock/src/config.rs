use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use taramock_oidc::OidcConfig;
use url::Url;

/// Upper bound for both the ID token and the authorization code lifetime.
pub const MAX_TTL_SECS: u64 = 86_400;

/// Service configuration loaded from a JSON file.
///
/// Every field except the two key paths has a default, so a minimal file
/// only names the signing keys.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Issuer identifier placed in `iss` and the discovery document.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub id_token_priv_key_path: PathBuf,
    pub id_token_pub_key_path: PathBuf,
    /// Key id published in the JWKS and set as the token header `kid`.
    #[serde(default = "default_key_id")]
    pub id_token_key_id: String,
    #[serde(default = "default_ttl_secs")]
    pub id_token_ttl_secs: u64,
    /// Lifetime of an unredeemed code. `0` disables expiry.
    #[serde(default = "default_ttl_secs")]
    pub code_ttl_secs: u64,
    #[serde(default = "default_identities_file")]
    pub identities_file: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// PEM certificate chain. Set together with `tls_key_path` to serve HTTPS.
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,
}

fn default_issuer() -> String {
    "http://localhost:8080".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_key_id() -> String {
    "taramock".to_string()
}

fn default_ttl_secs() -> u64 {
    600
}

fn default_identities_file() -> PathBuf {
    PathBuf::from("identities.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Reads and validates the configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_json(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides for the listen address.
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        let issuer = Url::parse(&self.issuer)
            .with_context(|| format!("issuer '{}' is not a valid URL", self.issuer))?;
        if !matches!(issuer.scheme(), "http" | "https") {
            bail!("issuer must be an http or https URL, got '{}'", self.issuer);
        }
        if issuer.query().is_some() || issuer.fragment().is_some() {
            bail!("issuer must not have a query or fragment");
        }
        if self.id_token_key_id.is_empty() {
            bail!("id_token_key_id must not be empty");
        }
        if !(1..=MAX_TTL_SECS).contains(&self.id_token_ttl_secs) {
            bail!("id_token_ttl_secs must be between 1 and {MAX_TTL_SECS}");
        }
        if self.code_ttl_secs > MAX_TTL_SECS {
            bail!("code_ttl_secs must not exceed {MAX_TTL_SECS}");
        }
        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            bail!("tls_cert_path and tls_key_path must be set together");
        }
        Ok(())
    }

    /// Certificate and key paths when HTTPS is configured.
    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert_path, &self.tls_key_path) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }

    /// True when the issuer advertises `https` but this process serves plain HTTP.
    pub fn expects_tls_proxy(&self) -> bool {
        self.issuer.starts_with("https://") && self.tls_paths().is_none()
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn oidc_config(&self) -> OidcConfig {
        let mut oidc = OidcConfig::new(self.issuer.clone());
        oidc.id_token_ttl = Duration::from_secs(self.id_token_ttl_secs);
        oidc.code_ttl = match self.code_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        oidc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "id_token_priv_key_path": "keys/idtoken.key",
        "id_token_pub_key_path": "keys/idtoken.pub"
    }"#;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(MINIMAL).unwrap();

        assert_eq!(config.issuer, "http://localhost:8080");
        assert!(config.tls_paths().is_none());
        assert!(!config.expects_tls_proxy());
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
        assert_eq!(config.id_token_key_id, "taramock");
        assert_eq!(config.identities_file, PathBuf::from("identities.json"));
        assert_eq!(config.log_level, "info");

        let oidc = config.oidc_config();
        assert_eq!(oidc.id_token_ttl, Duration::from_secs(600));
        assert_eq!(oidc.code_ttl, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_key_paths_are_required() {
        assert!(Config::from_json(r#"{"issuer": "https://localhost:8080"}"#).is_err());
    }

    #[test]
    fn test_zero_code_ttl_disables_expiry() {
        let config = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "code_ttl_secs": 0
            }"#,
        )
        .unwrap();

        assert_eq!(config.oidc_config().code_ttl, None);
    }

    #[test]
    fn test_invalid_issuer_rejected() {
        let result = Config::from_json(
            r#"{
                "issuer": "localhost:8080",
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub"
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_zero_id_token_ttl_rejected() {
        let result = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "id_token_ttl_secs": 0
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_code_ttl_rejected() {
        let result = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "code_ttl_secs": 10000000000000
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_oversized_id_token_ttl_rejected() {
        let result = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "id_token_ttl_secs": 18446744073709551615
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_max_ttls_accepted() {
        let config = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "id_token_ttl_secs": 86400,
                "code_ttl_secs": 86400
            }"#,
        )
        .unwrap();

        assert_eq!(config.oidc_config().id_token_ttl, Duration::from_secs(86_400));
    }

    #[test]
    fn test_tls_paths_must_be_paired() {
        let result = Config::from_json(
            r#"{
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "tls_cert_path": "tls.crt"
            }"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_tls_paths() {
        let config = Config::from_json(
            r#"{
                "issuer": "https://localhost:8443",
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub",
                "tls_cert_path": "tls.crt",
                "tls_key_path": "tls.key"
            }"#,
        )
        .unwrap();

        let (cert, key) = config.tls_paths().unwrap();
        assert_eq!(cert, Path::new("tls.crt"));
        assert_eq!(key, Path::new("tls.key"));
        assert!(!config.expects_tls_proxy());
    }

    #[test]
    fn test_https_issuer_without_tls_expects_proxy() {
        let config = Config::from_json(
            r#"{
                "issuer": "https://tara-mock.example",
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub"
            }"#,
        )
        .unwrap();

        assert!(config.expects_tls_proxy());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::from_json(MINIMAL)
            .unwrap()
            .with_overrides(Some("127.0.0.1".to_string()), Some(9090));

        assert_eq!(config.listen_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn test_issuer_trailing_slash_trimmed_for_oidc() {
        let config = Config::from_json(
            r#"{
                "issuer": "https://localhost:8080/",
                "id_token_priv_key_path": "a.key",
                "id_token_pub_key_path": "a.pub"
            }"#,
        )
        .unwrap();

        assert_eq!(config.oidc_config().issuer, "https://localhost:8080");
    }
}
