use regmirror_sync::{IntegrityError, SyncError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("store error: {0}")]
    Store(#[from] regmirror_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid register definition: {0}")]
    InvalidRegisterDefinition(String),
}

impl ClientError {
    /// The integrity failure behind this error, if a refresh was rejected.
    pub fn integrity(&self) -> Option<&IntegrityError> {
        match self {
            ClientError::Sync(SyncError::Integrity(e)) => Some(e),
            _ => None,
        }
    }
}

impl From<IntegrityError> for ClientError {
    fn from(e: IntegrityError) -> Self {
        ClientError::Sync(SyncError::Integrity(e))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
