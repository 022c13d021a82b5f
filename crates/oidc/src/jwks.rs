//! JSON Web Key Set document served at `/oidc/jwks`.

use serde::{Deserialize, Serialize};

/// JSON Web Key Set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// RSA public key in JWK form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type, always "RSA".
    pub kty: String,

    /// Key id, matches the `kid` header of issued ID tokens.
    pub kid: String,

    /// Key use, "sig".
    #[serde(rename = "use")]
    pub use_: String,

    pub alg: String,

    /// Modulus (base64url).
    pub n: String,

    /// Exponent (base64url).
    pub e: String,
}

impl Jwks {
    /// Finds a key by its id.
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid == kid)
    }
}
