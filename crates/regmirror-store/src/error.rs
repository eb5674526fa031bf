use regmirror_types::{EntryNumber, Partition};

/// Errors from store and record operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// An item payload is not a JSON object.
    #[error("cannot decode item {hash}: {reason}")]
    Decode { hash: String, reason: String },

    /// History was requested for a key the collection does not contain.
    #[error("no records for key: {0}")]
    KeyNotFound(String),

    /// An entry was appended with a number other than the partition's next.
    #[error("{partition} entry appended out of order: expected {expected}, got {actual}")]
    OutOfOrder {
        partition: Partition,
        expected: EntryNumber,
        actual: EntryNumber,
    },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
