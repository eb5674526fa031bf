use regmirror_types::EntryNumber;
use thiserror::Error;

/// The fetched data cannot be trusted to extend the local mirror.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// The remote reports fewer entries than the mirror already holds.
    #[error("remote has {remote} entries but the mirror already holds {local}")]
    EntryCountRegression { local: EntryNumber, remote: EntryNumber },

    #[error("root hash mismatch: expected {expected}, got {actual}")]
    RootHashMismatch { expected: String, actual: String },

    /// A non-empty segment did not begin and end with `assert-root-hash`.
    #[error("segment is missing its {0} checkpoint")]
    MissingCheckpoint(&'static str),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid register proof: {0}")]
    InvalidProof(String),

    #[error("store error: {0}")]
    Store(#[from] regmirror_store::StoreError),
}

pub type SyncResult<T> = Result<T, SyncError>;
