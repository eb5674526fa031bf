use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("value must be a sha-256 hash string prefixed with \"sha-256:\", got {0:?}")]
    InvalidHash(String),

    #[error("unknown partition: {0:?}")]
    UnknownPartition(String),
}
