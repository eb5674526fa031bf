//! In-memory register store.
//!
//! Holds everything a register mirror knows: content-addressed items, one
//! append-only entry log per partition, and a per-key index from which
//! current records and full histories are projected.
//!
//! # Types
//!
//! - [`Item`]: immutable value addressed by the SHA-256 of its payload
//! - [`Entry`]: assertion binding a key to an item hash
//! - [`Record`]: an entry paired with its resolved item
//! - [`Collection`], [`RecordMapCollection`]: paged result wrappers
//!
//! # Storage Backends
//!
//! All backends implement the [`DataStore`] trait:
//!
//! - [`InMemoryDataStore`]: memory-resident store; nothing survives a restart
//!
//! # Design Rules
//!
//! 1. Items and entries are immutable once added.
//! 2. Raw payload and line text is dropped after its first parse.
//! 3. Entry numbers are gap-free per partition.
//! 4. Records are projections, rebuilt on every query.

pub mod collection;
pub mod entry;
pub mod error;
pub mod item;
pub mod memory;
pub mod record;
pub mod traits;

pub use collection::{
    Collection, EntryCollection, ItemCollection, PageResult, Paginator, RecordCollection,
    RecordMapCollection, DEFAULT_PAGE_SIZE,
};
pub use entry::{Entry, EntryFields};
pub use error::{StoreError, StoreResult};
pub use item::{Item, ItemValue, END_DATE_FIELD};
pub use memory::InMemoryDataStore;
pub use record::Record;
pub use traits::DataStore;
