//! Foundation types for the register mirror.
//!
//! Every other `regmirror` crate depends on this one.
//!
//! # Key Types
//!
//! - [`ItemHash`]: content address of an item (`sha-256:` + 64 hex digits)
//! - [`Partition`]: the `user` or `system` entry stream
//! - [`Partitioned`]: one value per partition, indexed by [`Partition`]
//! - [`EntryNumber`]: 1-based position of an entry within its partition

pub mod error;
pub mod hash;
pub mod partition;

pub use error::TypeError;
pub use hash::{ItemHash, HASH_PREFIX};
pub use partition::{Partition, Partitioned};

/// 1-based position of an entry within its partition. Zero means "no entries".
pub type EntryNumber = u64;
