use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("identity catalog is empty")]
    Empty,

    #[error("identity #{0} has an empty subject")]
    MissingSubject(usize),

    #[error("duplicate identity subject: {0}")]
    DuplicateSubject(String),
}
