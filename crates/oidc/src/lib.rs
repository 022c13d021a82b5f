//! OIDC provider endpoints for TARA-Mock.
//!
//! This crate provides:
//! - Authorization endpoint and the `/back` login-completion hop
//! - Token endpoint issuing RS256-signed ID tokens
//! - JWKS and discovery documents
//! - In-memory single-use store for pending claims
//! - Signing key loading from PEM files

mod config;
mod discovery;
mod error;
mod extractors;
mod handlers;
mod jwks;
mod keys;
mod state;
mod store;
mod templates;
mod token;

pub use config::{OidcConfig, DEFAULT_CODE_TTL, DEFAULT_ID_TOKEN_TTL};
pub use discovery::ProviderMetadata;
pub use error::{AuthorizeError, TokenError};
pub use extractors::BasicClientId;
pub use handlers::{oidc_routes, TokenResponse};
pub use jwks::{Jwk, Jwks};
pub use keys::{KeyError, SigningKeys};
pub use state::OidcState;
pub use store::ClaimsStore;
pub use templates::html_escape;
pub use token::{IdTokenClaims, IssuedIdToken, TokenSigner, ID_TOKEN_ALGORITHM};
