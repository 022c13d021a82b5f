use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("authorization code is already pending")]
    CodeCollision,

    #[error("storage error: {0}")]
    Storage(String),
}
