use std::sync::Arc;

use indexmap::IndexMap;
use regmirror_types::{EntryNumber, ItemHash, Partition, Partitioned};
use tracing::debug;

use crate::collection::{
    EntryCollection, ItemCollection, RecordCollection, RecordMapCollection, DEFAULT_PAGE_SIZE,
};
use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::item::Item;
use crate::record::Record;
use crate::traits::DataStore;

/// Entry log and key index for one partition.
#[derive(Default)]
struct PartitionLog {
    entries: Vec<Arc<Entry>>,
    /// Key to entry numbers, in append order. Keys keep first-seen order.
    index: IndexMap<String, Vec<EntryNumber>>,
}

impl PartitionLog {
    fn get(&self, entry_number: EntryNumber) -> Option<&Arc<Entry>> {
        let position = usize::try_from(entry_number).ok()?.checked_sub(1)?;
        self.entries.get(position)
    }

    fn latest_entry_number(&self) -> EntryNumber {
        self.entries.last().map_or(0, |e| e.entry_number())
    }
}

/// Memory-resident store for tests, tools, and short-lived mirrors.
///
/// Nothing is persisted; a new process starts from an empty mirror and
/// fetches the full log.
pub struct InMemoryDataStore {
    items: IndexMap<ItemHash, Arc<Item>>,
    logs: Partitioned<PartitionLog>,
    root_hash: Option<String>,
    page_size: usize,
    loads: u64,
}

impl InMemoryDataStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: IndexMap::new(),
            logs: Partitioned::default(),
            root_hash: None,
            page_size: page_size.max(1),
            loads: 0,
        }
    }

    /// Number of distinct items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of segments applied so far.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    fn resolve(&self, entry: &Arc<Entry>) -> Record {
        let item = self.items.get(entry.fields().item_hash.as_str()).cloned();
        Record::new(Arc::clone(entry), item)
    }

    fn current(&self, partition: Partition, numbers: &[EntryNumber]) -> Option<Record> {
        let latest = numbers.iter().copied().max()?;
        self.logs[partition].get(latest).map(|e| self.resolve(e))
    }

    fn history(&self, partition: Partition, numbers: &[EntryNumber]) -> Vec<Record> {
        let log = &self.logs[partition];
        numbers
            .iter()
            .filter_map(|n| log.get(*n))
            .map(|e| self.resolve(e))
            .collect()
    }
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore for InMemoryDataStore {
    fn add_item(&mut self, item: Item) {
        self.items.insert(item.hash().clone(), Arc::new(item));
    }

    fn append_entry(&mut self, entry: Entry) -> StoreResult<()> {
        let partition = entry.partition();
        let log = &mut self.logs[partition];
        let expected = log.latest_entry_number() + 1;
        if entry.entry_number() != expected {
            return Err(StoreError::OutOfOrder {
                partition,
                expected,
                actual: entry.entry_number(),
            });
        }

        // Indexing by key parses the line.
        let key = entry.key();
        log.index.entry(key).or_default().push(entry.entry_number());
        log.entries.push(Arc::new(entry));
        Ok(())
    }

    fn item(&self, hash: &str) -> Option<Arc<Item>> {
        self.items.get(hash).cloned()
    }

    fn items(&self) -> ItemCollection {
        ItemCollection::new(self.items.values().cloned().collect(), self.page_size)
    }

    fn entry(&self, partition: Partition, entry_number: EntryNumber) -> Option<Arc<Entry>> {
        self.logs[partition].get(entry_number).cloned()
    }

    fn entries(&self, partition: Partition) -> EntryCollection {
        EntryCollection::new(self.logs[partition].entries.clone(), self.page_size)
    }

    fn record(&self, partition: Partition, key: &str) -> Option<Record> {
        let numbers = self.logs[partition].index.get(key)?;
        self.current(partition, numbers)
    }

    fn records(&self, partition: Partition) -> RecordCollection {
        let records = self.logs[partition]
            .index
            .values()
            .filter_map(|numbers| self.current(partition, numbers))
            .collect();
        RecordCollection::new(records, self.page_size)
    }

    fn record_history(&self, partition: Partition, key: &str) -> Vec<Record> {
        self.logs[partition]
            .index
            .get(key)
            .map(|numbers| self.history(partition, numbers))
            .unwrap_or_default()
    }

    fn records_with_history(&self, partition: Partition) -> RecordMapCollection {
        let data = self.logs[partition]
            .index
            .iter()
            .map(|(key, numbers)| (key.clone(), self.history(partition, numbers)))
            .collect();
        RecordMapCollection::new(data, self.page_size)
    }

    fn latest_entry_number(&self, partition: Partition) -> EntryNumber {
        self.logs[partition].latest_entry_number()
    }

    fn latest_root_hash(&self) -> Option<&str> {
        self.root_hash.as_deref()
    }

    fn update_root_hash(&mut self, hash: &str) {
        self.root_hash = Some(hash.to_string());
    }

    fn after_load(&mut self) {
        self.loads += 1;
        debug!(
            loads = self.loads,
            items = self.items.len(),
            user_entries = self.logs[Partition::User].entries.len(),
            system_entries = self.logs[Partition::System].entries.len(),
            "segment applied to in-memory store"
        );
    }

    fn page_size(&self) -> usize {
        self.page_size
    }
}

impl std::fmt::Debug for InMemoryDataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDataStore")
            .field("item_count", &self.items.len())
            .field("user_entries", &self.logs[Partition::User].entries.len())
            .field("system_entries", &self.logs[Partition::System].entries.len())
            .field("root_hash", &self.root_hash)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CZ_OLD: &str = r#"{"citizen-names":"Czech","country":"CZ","name":"Czech Republic","official-name":"The Czech Republic","start-date":"1993-01-01"}"#;
    const CZ_NEW: &str = r#"{"citizen-names":"Czech","country":"CZ","name":"Czechia","official-name":"The Czech Republic","start-date":"1993-01-01"}"#;
    const GB: &str = r#"{"citizen-names":"Briton;British citizen","country":"GB","name":"United Kingdom","official-name":"The United Kingdom of Great Britain and Northern Ireland"}"#;
    const NAME: &str = r#"{"name":"country"}"#;

    fn line(partition: Partition, key: &str, payload: &str) -> String {
        format!(
            "append-entry\t{partition}\t{key}\t2016-04-05T13:23:05Z\t{}",
            Item::new(payload).hash()
        )
    }

    /// Add the item and append the next entry for it.
    fn put(store: &mut InMemoryDataStore, partition: Partition, key: &str, payload: &str) {
        store.add_item(Item::new(payload));
        let n = store.latest_entry_number(partition) + 1;
        store
            .append_entry(Entry::new(line(partition, key, payload), n, partition))
            .unwrap();
    }

    fn populated() -> InMemoryDataStore {
        let mut store = InMemoryDataStore::with_page_size(2);
        put(&mut store, Partition::System, "name", NAME);
        put(&mut store, Partition::User, "GB", GB);
        put(&mut store, Partition::User, "CZ", CZ_OLD);
        put(&mut store, Partition::User, "CZ", CZ_NEW);
        store
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    #[test]
    fn add_and_get_item() {
        let mut store = InMemoryDataStore::new();
        let item = Item::new(CZ_NEW);
        let hash = item.hash().clone();
        store.add_item(item);

        let read_back = store.item(hash.as_str()).expect("should exist");
        assert_eq!(*read_back, Item::new(CZ_NEW));
        assert_eq!(
            hash.as_str(),
            "sha-256:c69c04fff98c59aabd739d43018e87a25fd51a00c37d100721cc68fa9003a720"
        );
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn adding_same_item_twice_keeps_one() {
        let mut store = InMemoryDataStore::new();
        store.add_item(Item::new(GB));
        store.add_item(Item::new(GB));
        assert_eq!(store.item_count(), 1);
    }

    #[test]
    fn unknown_item_is_none() {
        let store = populated();
        assert!(store
            .item("sha-256:abcdefghijklmnopqrstuvwxyzabcdefghijklmnopqrstuvwxyz")
            .is_none());
    }

    // -----------------------------------------------------------------------
    // Entries
    // -----------------------------------------------------------------------

    #[test]
    fn entries_are_numbered_per_partition() {
        let store = populated();
        assert_eq!(store.latest_entry_number(Partition::User), 3);
        assert_eq!(store.latest_entry_number(Partition::System), 1);
        let numbers: Vec<_> = store
            .entries(Partition::User)
            .iter()
            .map(|e| e.entry_number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn empty_partition_reports_zero() {
        assert_eq!(InMemoryDataStore::new().latest_entry_number(Partition::User), 0);
    }

    #[test]
    fn entry_lookup_bounds() {
        let store = populated();
        assert_eq!(store.entry(Partition::User, 1).unwrap().key(), "GB");
        assert!(store.entry(Partition::User, 0).is_none());
        assert!(store.entry(Partition::User, 4).is_none());
        assert_eq!(store.entry(Partition::System, 1).unwrap().key(), "name");
    }

    #[test]
    fn appended_entry_is_parsed_for_indexing() {
        let mut store = InMemoryDataStore::new();
        let entry = Entry::new(line(Partition::User, "GB", GB), 1, Partition::User);
        assert!(!entry.is_parsed());
        store.append_entry(entry).unwrap();
        assert!(store.entry(Partition::User, 1).unwrap().is_parsed());
    }

    #[test]
    fn out_of_order_append_is_rejected() {
        let mut store = populated();
        let err = store
            .append_entry(Entry::new(line(Partition::User, "FR", GB), 7, Partition::User))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::OutOfOrder {
                partition: Partition::User,
                expected: 4,
                actual: 7
            }
        );
        assert_eq!(store.latest_entry_number(Partition::User), 3);
    }

    // -----------------------------------------------------------------------
    // Records
    // -----------------------------------------------------------------------

    #[test]
    fn current_record_uses_latest_entry() {
        let store = populated();
        let record = store.record(Partition::User, "CZ").unwrap();
        assert_eq!(record.entry().entry_number(), 3);
        assert_eq!(record.item().unwrap().hash(), Item::new(CZ_NEW).hash());
        assert_eq!(record.entry(), &store.entry(Partition::User, 3).unwrap());
    }

    #[test]
    fn unknown_key_has_no_record() {
        assert!(populated().record(Partition::User, "XYZ").is_none());
    }

    #[test]
    fn records_one_per_key_in_first_seen_order() {
        let store = populated();
        let records = store.records(Partition::User);
        let keys: Vec<_> = records.iter().map(Record::key).collect();
        assert_eq!(keys, vec!["GB", "CZ"]);
        assert_eq!(records.page_size(), 2);
        assert_eq!(store.records(Partition::System).len(), 1);
    }

    #[test]
    fn history_is_complete_and_ordered() {
        let store = populated();
        let history = store.records_with_history(Partition::User);
        assert_eq!(history.len(), 2);
        let cz = history.records_for_key("CZ").unwrap();
        assert_eq!(cz.len(), 2);
        assert_eq!(cz[0].item().unwrap().hash(), Item::new(CZ_OLD).hash());
        assert_eq!(cz[1].item().unwrap().hash(), Item::new(CZ_NEW).hash());
        assert_eq!(store.record_history(Partition::User, "CZ"), cz.to_vec());
        assert!(store.record_history(Partition::User, "XYZ").is_empty());
    }

    #[test]
    fn record_with_missing_item_still_resolves_entry() {
        let mut store = InMemoryDataStore::new();
        store
            .append_entry(Entry::new(line(Partition::User, "GB", GB), 1, Partition::User))
            .unwrap();
        let record = store.record(Partition::User, "GB").unwrap();
        assert!(record.item().is_none());
    }

    // -----------------------------------------------------------------------
    // Root hash and load hook
    // -----------------------------------------------------------------------

    #[test]
    fn root_hash_starts_unset_and_updates() {
        let mut store = InMemoryDataStore::new();
        assert!(store.latest_root_hash().is_none());
        store.update_root_hash("sha-256:abc");
        assert_eq!(store.latest_root_hash(), Some("sha-256:abc"));
    }

    #[test]
    fn after_load_counts_segments() {
        let mut store = InMemoryDataStore::new();
        store.after_load();
        store.after_load();
        assert_eq!(store.load_count(), 2);
    }

    #[test]
    fn debug_format() {
        let debug = format!("{:?}", populated());
        assert!(debug.contains("InMemoryDataStore"));
        assert!(debug.contains("item_count"));
    }
}
