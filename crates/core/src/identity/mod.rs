mod error;
mod types;

pub use error::CatalogError;
pub use types::{Identity, IdentityCatalog};
