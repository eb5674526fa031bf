//! Incremental synchronization for register mirrors.
//!
//! A refresh fetches the log segment after the mirror's last user entry,
//! checks its boundary checkpoints against the local anchor and the live
//! proof, and only then applies it to a [`DataStore`](regmirror_store::DataStore).
//! Verification never mutates the store, so a failed refresh leaves the mirror
//! in its last good state.

pub mod error;
pub mod http;
pub mod loader;
pub mod memory;
pub mod transport;
pub mod types;
pub mod verifier;

pub use error::{IntegrityError, SyncError, SyncResult};
pub use http::HttpTransport;
pub use loader::SegmentLoader;
pub use memory::InMemoryTransport;
pub use transport::RemoteTransport;
pub use types::{RefreshReport, RegisterProof, VerifiedSegment};
pub use verifier::SegmentVerifier;
