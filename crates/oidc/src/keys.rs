//! RSA key material for signing ID tokens.
//!
//! The key pair is read once at startup. Loading is fallible and returns a
//! `KeyError`; deciding whether to abort is left to the caller.

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::EncodingKey;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use thiserror::Error;

use crate::jwks::Jwk;
use crate::token::ID_TOKEN_ALGORITHM_NAME;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read {kind} key from {}: {source}", path.display())]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} key: {message}")]
    Parse { kind: &'static str, message: String },

    #[error("public key does not belong to the private key")]
    Mismatch,

    #[error("key id must not be empty")]
    EmptyKeyId,
}

/// RSA signing key, its public half, and the key id published in the JWKS.
pub struct SigningKeys {
    kid: String,
    encoding_key: EncodingKey,
    public_key: RsaPublicKey,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl SigningKeys {
    /// Reads a PEM key pair from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read or parsed, or if the
    /// public key does not match the private key.
    pub fn load(
        kid: impl Into<String>,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> Result<Self, KeyError> {
        let private_pem = read_pem("private", private_key_path)?;
        let public_pem = read_pem("public", public_key_path)?;

        let keys = Self::from_pem(kid, &private_pem, &public_pem)?;

        tracing::info!(
            kid = %keys.kid,
            private_key = %private_key_path.display(),
            public_key = %public_key_path.display(),
            "Loaded ID token signing keys"
        );

        Ok(keys)
    }

    /// Builds the key pair from PEM strings.
    ///
    /// The private key may be PKCS#8 (`PRIVATE KEY`) or PKCS#1
    /// (`RSA PRIVATE KEY`); the public key may be SPKI (`PUBLIC KEY`) or
    /// PKCS#1 (`RSA PUBLIC KEY`).
    pub fn from_pem(
        kid: impl Into<String>,
        private_pem: &str,
        public_pem: &str,
    ) -> Result<Self, KeyError> {
        let kid = kid.into();
        if kid.is_empty() {
            return Err(KeyError::EmptyKeyId);
        }

        let private_key = parse_private_key(private_pem)?;
        let public_key = parse_public_key(public_pem)?;

        if private_key.to_public_key() != public_key {
            return Err(KeyError::Mismatch);
        }

        let der = private_key
            .to_pkcs1_der()
            .map_err(|e| KeyError::Parse {
                kind: "private",
                message: e.to_string(),
            })?;
        let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

        Ok(Self {
            kid,
            encoding_key,
            public_key,
        })
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Exports the public key as a JWK.
    pub fn to_jwk(&self) -> Jwk {
        let (n, e) = encode_components(&self.public_key);
        Jwk {
            kty: "RSA".to_string(),
            kid: self.kid.clone(),
            use_: "sig".to_string(),
            alg: ID_TOKEN_ALGORITHM_NAME.to_string(),
            n,
            e,
        }
    }
}

fn read_pem(kind: &'static str, path: &Path) -> Result<String, KeyError> {
    std::fs::read_to_string(path).map_err(|source| KeyError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, KeyError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| KeyError::Parse {
            kind: "private",
            message: e.to_string(),
        })
}

fn parse_public_key(pem: &str) -> Result<RsaPublicKey, KeyError> {
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| KeyError::Parse {
            kind: "public",
            message: e.to_string(),
        })
}

/// Base64url (unpadded) modulus and exponent.
fn encode_components(public_key: &RsaPublicKey) -> (String, String) {
    (
        URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
        URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
    )
}


#[cfg(test)]
mod tests {
    use super::test_keys::*;
    use super::*;

    #[test]
    fn test_from_pem_pkcs8_and_spki() {
        let keys = SigningKeys::from_pem("k1", SIGNING_KEY, SIGNING_PUB).unwrap();
        assert_eq!(keys.kid(), "k1");
    }

    #[test]
    fn test_from_pem_pkcs1() {
        let keys = SigningKeys::from_pem("k2", OTHER_KEY, OTHER_PUB).unwrap();
        assert_eq!(keys.kid(), "k2");
    }

    #[test]
    fn test_mismatched_pair_rejected() {
        let result = SigningKeys::from_pem("k1", SIGNING_KEY, OTHER_PUB);
        assert!(matches!(result, Err(KeyError::Mismatch)));
    }

    #[test]
    fn test_garbage_private_key_rejected() {
        let result = SigningKeys::from_pem("k1", "not a key", SIGNING_PUB);
        assert!(matches!(
            result,
            Err(KeyError::Parse {
                kind: "private",
                ..
            })
        ));
    }

    #[test]
    fn test_public_key_in_private_slot_rejected() {
        let result = SigningKeys::from_pem("k1", SIGNING_PUB, SIGNING_PUB);
        assert!(matches!(result, Err(KeyError::Parse { .. })));
    }

    #[test]
    fn test_empty_kid_rejected() {
        let result = SigningKeys::from_pem("", SIGNING_KEY, SIGNING_PUB);
        assert!(matches!(result, Err(KeyError::EmptyKeyId)));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SigningKeys::load(
            "k1",
            Path::new("/nonexistent/idtoken.key"),
            Path::new("/nonexistent/idtoken.pub"),
        );
        match result {
            Err(KeyError::Read { kind, path, .. }) => {
                assert_eq!(kind, "private");
                assert_eq!(path, PathBuf::from("/nonexistent/idtoken.key"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_files() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata");
        let keys =
            SigningKeys::load("k1", &dir.join("signing.key"), &dir.join("signing.pub")).unwrap();
        assert_eq!(keys.kid(), "k1");
    }

    #[test]
    fn test_jwk_export() {
        let jwk = signing_keys().to_jwk();

        assert_eq!(jwk.kty, "RSA");
        assert_eq!(jwk.use_, "sig");
        assert_eq!(jwk.alg, "RS256");
        assert_eq!(jwk.kid, "test-key");
        assert_eq!(jwk.e, "AQAB");
        // 2048-bit modulus -> 256 bytes -> 342 base64url chars without padding.
        assert_eq!(jwk.n.len(), 342);
    }
}
