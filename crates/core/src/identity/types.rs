use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::CatalogError;

/// A simulated user the provider can authenticate as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject identifier, e.g. a personal identification code.
    pub sub: String,
    pub given_name: String,
    pub family_name: String,
}

/// Ordered, non-empty set of identities. The first entry is the default.
#[derive(Debug, Clone)]
pub struct IdentityCatalog {
    identities: Vec<Identity>,
}

impl IdentityCatalog {
    /// Builds a catalog, rejecting empty catalogs and duplicate or blank subjects.
    pub fn new(identities: Vec<Identity>) -> Result<Self, CatalogError> {
        if identities.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, identity) in identities.iter().enumerate() {
            if identity.sub.is_empty() {
                return Err(CatalogError::MissingSubject(index));
            }
            if !seen.insert(identity.sub.as_str()) {
                return Err(CatalogError::DuplicateSubject(identity.sub.clone()));
            }
        }

        Ok(Self { identities })
    }

    /// Identity used when the request does not select one.
    pub fn default_identity(&self) -> &Identity {
        // `new` guarantees at least one entry.
        &self.identities[0]
    }

    pub fn find(&self, sub: &str) -> Option<&Identity> {
        self.identities.iter().find(|identity| identity.sub == sub)
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(sub: &str, given: &str, family: &str) -> Identity {
        Identity {
            sub: sub.to_string(),
            given_name: given.to_string(),
            family_name: family.to_string(),
        }
    }

    #[test]
    fn first_identity_is_default() {
        let catalog = IdentityCatalog::new(vec![
            identity("EE60001019906", "MARY ÄNN", "O'CONNEŽ-ŠUSLIK TESTNUMBER"),
            identity("EE38001085718", "JAAK-KRISTJAN", "JÕEORG"),
        ])
        .unwrap();

        assert_eq!(catalog.default_identity().sub, "EE60001019906");
    }

    #[test]
    fn find_by_subject() {
        let catalog = IdentityCatalog::new(vec![
            identity("EE60001019906", "MARY ÄNN", "O'CONNEŽ-ŠUSLIK TESTNUMBER"),
            identity("EE38001085718", "JAAK-KRISTJAN", "JÕEORG"),
        ])
        .unwrap();

        let found = catalog.find("EE38001085718").unwrap();
        assert_eq!(found.family_name, "JÕEORG");
        assert!(catalog.find("EE00000000000").is_none());
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(IdentityCatalog::new(vec![]).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn rejects_blank_subject() {
        let err = IdentityCatalog::new(vec![
            identity("EE60001019906", "MARY ÄNN", "O'CONNEŽ-ŠUSLIK TESTNUMBER"),
            identity("", "NO", "SUBJECT"),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::MissingSubject(1));
    }

    #[test]
    fn rejects_duplicate_subject() {
        let err = IdentityCatalog::new(vec![
            identity("EE38001085718", "JAAK-KRISTJAN", "JÕEORG"),
            identity("EE38001085718", "JAAK", "JÕEORG"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            CatalogError::DuplicateSubject("EE38001085718".to_string())
        );
    }

    #[test]
    fn deserializes_catalog_entries() {
        let json = r#"[{"sub":"EE38001085718","given_name":"JAAK-KRISTJAN","family_name":"JÕEORG"}]"#;
        let identities: Vec<Identity> = serde_json::from_str(json).unwrap();
        let catalog = IdentityCatalog::new(identities).unwrap();
        assert_eq!(catalog.identities().len(), 1);
    }
}
