use std::sync::Arc;

use crate::entry::Entry;
use crate::item::Item;

/// An entry paired with the item its hash resolves to.
///
/// Records are built on demand by queries and never stored. The item is
/// `None` when the entry references a hash the store has not seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    entry: Arc<Entry>,
    item: Option<Arc<Item>>,
}

impl Record {
    pub fn new(entry: Arc<Entry>, item: Option<Arc<Item>>) -> Self {
        Self { entry, item }
    }

    pub fn entry(&self) -> &Arc<Entry> {
        &self.entry
    }

    pub fn item(&self) -> Option<&Arc<Item>> {
        self.item.as_ref()
    }

    pub fn key(&self) -> String {
        self.entry.key()
    }

    /// Whether the record's item carries an end date. Unresolved items are
    /// never expired.
    pub fn is_expired(&self) -> bool {
        self.item.as_ref().is_some_and(|item| item.has_end_date())
    }
}
