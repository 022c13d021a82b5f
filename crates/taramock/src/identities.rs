//! Loading of the simulated-user catalog.

use std::path::Path;

use anyhow::{Context, Result};
use taramock_core::identity::{Identity, IdentityCatalog};

/// Reads the identity catalog from a JSON file.
pub fn load_identities(path: &Path) -> Result<IdentityCatalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read identities file {}", path.display()))?;

    let catalog = parse_identities(&raw)
        .with_context(|| format!("invalid identities file {}", path.display()))?;

    tracing::info!(
        count = catalog.identities().len(),
        default = %catalog.default_identity().sub,
        "Loaded identity catalog"
    );

    Ok(catalog)
}

/// Parses a JSON array of `{ "sub", "given_name", "family_name" }` objects.
pub fn parse_identities(raw: &str) -> Result<IdentityCatalog> {
    let identities: Vec<Identity> = serde_json::from_str(raw)?;
    Ok(IdentityCatalog::new(identities)?)
}
