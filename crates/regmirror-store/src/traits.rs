use std::sync::Arc;

use regmirror_types::{EntryNumber, Partition};

use crate::collection::{EntryCollection, ItemCollection, RecordCollection, RecordMapCollection};
use crate::entry::Entry;
use crate::error::StoreResult;
use crate::item::Item;
use crate::record::Record;

/// Backing store for a register mirror.
///
/// All implementations must satisfy these invariants:
/// - Items are keyed by content address; adding the same item twice leaves
///   one copy.
/// - Each partition's entries are numbered 1, 2, 3, ... in append order. The
///   caller assigns numbers; the store rejects anything but the next one.
/// - The current record for a key is built from its highest-numbered entry.
/// - Mutations take `&mut self`, so a store has exactly one writer.
/// - Operations never touch the network or disk.
pub trait DataStore: Send + Sync {
    /// Insert an item, replacing any item with the same hash.
    fn add_item(&mut self, item: Item);

    /// Append an entry to its partition's log and index it under its key.
    fn append_entry(&mut self, entry: Entry) -> StoreResult<()>;

    fn item(&self, hash: &str) -> Option<Arc<Item>>;

    fn items(&self) -> ItemCollection;

    /// `None` unless `1 <= entry_number <= latest_entry_number(partition)`.
    fn entry(&self, partition: Partition, entry_number: EntryNumber) -> Option<Arc<Entry>>;

    /// All entries of a partition, in append order.
    fn entries(&self, partition: Partition) -> EntryCollection;

    /// The current record for `key`, or `None` if the key was never asserted.
    fn record(&self, partition: Partition, key: &str) -> Option<Record>;

    /// One current record per known key.
    fn records(&self, partition: Partition) -> RecordCollection;

    /// Every record ever asserted for `key`, oldest first. Empty for unknown keys.
    fn record_history(&self, partition: Partition, key: &str) -> Vec<Record>;

    /// Full history for every known key.
    fn records_with_history(&self, partition: Partition) -> RecordMapCollection;

    /// Number of the last entry in the partition, or 0 when it is empty.
    fn latest_entry_number(&self, partition: Partition) -> EntryNumber;

    /// The last root hash applied from a verified segment.
    fn latest_root_hash(&self) -> Option<&str>;

    fn update_root_hash(&mut self, hash: &str);

    /// Called once after each segment has been applied.
    fn after_load(&mut self) {}

    /// Page size attached to returned collections.
    fn page_size(&self) -> usize;
}
