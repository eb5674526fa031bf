use async_trait::async_trait;
use regmirror_types::EntryNumber;

use crate::error::SyncResult;
use crate::types::RegisterProof;

/// Transport interface for a remote register.
///
/// Implementations do not retry; failures propagate to the caller of the
/// refresh unchanged.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// The log segment starting strictly after user entry `after`, as RSF text.
    async fn fetch_segment(&self, after: EntryNumber) -> SyncResult<String>;

    /// The register's current entry count and root hash.
    async fn fetch_proof(&self) -> SyncResult<RegisterProof>;
}
