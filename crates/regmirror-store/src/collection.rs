//! Result collections handed to callers.
//!
//! Every query returns its results wrapped with the store's page size so
//! callers can page through them without re-querying.

use std::slice;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::entry::Entry;
use crate::error::{StoreError, StoreResult};
use crate::item::Item;
use crate::record::Record;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// One page of results plus the totals needed to render page navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub total_results: usize,
    pub total_pages: usize,
    pub more_results: bool,
}

/// Ordered result list with a page size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collection<T> {
    data: Vec<T>,
    page_size: usize,
}

pub type ItemCollection = Collection<Arc<Item>>;
pub type EntryCollection = Collection<Arc<Entry>>;
pub type RecordCollection = Collection<Record>;

impl<T> Collection<T> {
    /// A zero page size is treated as 1.
    pub fn new(data: Vec<T>, page_size: usize) -> Self {
        Self {
            data,
            page_size: page_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Elements `[(page-1)*size, min(page*size, len))`, 1-based.
    ///
    /// A collection that fits in one page returns everything for any page
    /// number. Page 0 is treated as page 1; pages past the end are empty.
    pub fn page(&self, page: usize) -> &[T] {
        let len = self.data.len();
        if len <= self.page_size {
            return &self.data;
        }
        let start = (page.max(1) - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        &self.data[start..end]
    }

    /// Number of pages, never less than one.
    pub fn total_pages(&self) -> usize {
        self.data.len().div_ceil(self.page_size).max(1)
    }

    /// A page together with result totals.
    pub fn paginate(&self, page: usize) -> PageResult<T>
    where
        T: Clone,
    {
        let total_results = self.data.len();
        let total_pages = self.total_pages();
        let page = if total_pages == 1 { 1 } else { page.max(1) };
        PageResult {
            data: self.page(page).to_vec(),
            page,
            total_results,
            total_pages,
            more_results: page < total_pages,
        }
    }

    /// Keep the elements matching `predicate`, preserving order and page size.
    pub fn filter(&self, mut predicate: impl FnMut(&T) -> bool) -> Self
    where
        T: Clone,
    {
        Self::new(
            self.data.iter().filter(|t| predicate(t)).cloned().collect(),
            self.page_size,
        )
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl Collection<Record> {
    /// Records whose item values contain `text`, case-insensitively.
    ///
    /// An empty filter keeps every record. Parsing an item for the search
    /// can fail, which aborts the filter.
    pub fn filter_text(&self, text: &str) -> StoreResult<Self> {
        if text.is_empty() {
            return Ok(self.clone());
        }
        let needle = text.to_lowercase();
        let mut kept = Vec::new();
        for record in &self.data {
            if record_contains(record, &needle)? {
                kept.push(record.clone());
            }
        }
        Ok(Self::new(kept, self.page_size))
    }
}

fn record_contains(record: &Record, needle: &str) -> StoreResult<bool> {
    let Some(item) = record.item() else {
        return Ok(false);
    };
    let value = item.value()?;
    Ok(value.values().any(|v| match v {
        Value::String(s) => s.to_lowercase().contains(needle),
        other => other.to_string().to_lowercase().contains(needle),
    }))
}

/// Records grouped by key, keys in first-appearance order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordMapCollection {
    data: IndexMap<String, Vec<Record>>,
    page_size: usize,
}

impl RecordMapCollection {
    pub fn new(data: IndexMap<String, Vec<Record>>, page_size: usize) -> Self {
        Self {
            data,
            page_size: page_size.max(1),
        }
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Full history for `key`, oldest first.
    ///
    /// Unlike current-record lookups, asking for the history of an unknown
    /// key is an error.
    pub fn records_for_key(&self, key: &str) -> StoreResult<&[Record]> {
        self.data
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    /// Iterate in slices of `page_size` keys.
    pub fn paginator(&self) -> Paginator<'_> {
        Paginator {
            iter: self.data.iter(),
            page_size: self.page_size,
        }
    }
}

/// Page-by-page iterator over a [`RecordMapCollection`].
pub struct Paginator<'a> {
    iter: indexmap::map::Iter<'a, String, Vec<Record>>,
    page_size: usize,
}

impl<'a> Iterator for Paginator<'a> {
    type Item = Vec<(&'a str, &'a [Record])>;

    fn next(&mut self) -> Option<Self::Item> {
        let page: Vec<_> = self
            .iter
            .by_ref()
            .take(self.page_size)
            .map(|(k, v)| (k.as_str(), v.as_slice()))
            .collect();
        if page.is_empty() {
            None
        } else {
            Some(page)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use regmirror_types::Partition;

    fn record(n: u64, key: &str, payload: &str) -> Record {
        let line = format!("append-entry\tuser\t{key}\t2016-04-05T13:23:05Z\tsha-256:00");
        Record::new(
            Arc::new(Entry::new(line, n, Partition::User)),
            Some(Arc::new(Item::new(payload))),
        )
    }

    fn five_records() -> Vec<Record> {
        ["CZ", "GM", "GB", "US", "ES"]
            .iter()
            .enumerate()
            .map(|(i, k)| record(i as u64 + 1, k, &format!("{{\"country\":\"{k}\"}}")))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Paging
    // -----------------------------------------------------------------------

    #[test]
    fn page_returns_everything_when_it_fits() {
        let c = Collection::new(vec![1, 2], 4);
        assert_eq!(c.page(1), &[1, 2]);
        assert_eq!(c.page(7), &[1, 2]);
    }

    #[test]
    fn second_page_of_five_with_size_four() {
        let records = five_records();
        let c = Collection::new(records.clone(), 4);
        assert_eq!(c.page(2), &records[4..]);
        assert_eq!(c.page(2)[0].key(), "ES");
    }

    #[test]
    fn page_zero_is_first_page_and_overflow_is_empty() {
        let c = Collection::new((1..=5).collect::<Vec<_>>(), 2);
        assert_eq!(c.page(0), &[1, 2]);
        assert!(c.page(4).is_empty());
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(Collection::new(vec!['a'], 0).page_size(), 1);
    }

    #[test]
    fn paginate_reports_totals() {
        let c = Collection::new((1..=5).collect::<Vec<_>>(), 2);
        let p = c.paginate(2);
        assert_eq!(p.data, vec![3, 4]);
        assert_eq!(p.total_results, 5);
        assert_eq!(p.total_pages, 3);
        assert!(p.more_results);
        assert!(!c.paginate(3).more_results);
    }

    #[test]
    fn paginate_single_page_ignores_page_number() {
        let p = Collection::new(vec![1, 2], 10).paginate(5);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.data, vec![1, 2]);
        assert!(!p.more_results);
    }

    proptest! {
        #[test]
        fn page_matches_slice_bounds(n in 0usize..60, size in 1usize..12, k in 1usize..10) {
            let data: Vec<usize> = (0..n).collect();
            let c = Collection::new(data.clone(), size);
            let expected: &[usize] = if n <= size {
                &data
            } else {
                let start = ((k - 1) * size).min(n);
                &data[start..(k * size).min(n)]
            };
            prop_assert_eq!(c.page(k), expected);
        }

        #[test]
        fn pages_cover_collection_exactly_once(n in 0usize..60, size in 1usize..12) {
            let data: Vec<usize> = (0..n).collect();
            let c = Collection::new(data.clone(), size);
            let joined: Vec<usize> = (1..=c.total_pages())
                .flat_map(|k| c.page(k).to_vec())
                .collect();
            prop_assert_eq!(joined, data);
        }
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    #[test]
    fn filter_text_matches_item_values_case_insensitively() {
        let c = Collection::new(
            vec![
                record(1, "GB", r#"{"name":"United Kingdom"}"#),
                record(2, "FR", r#"{"name":"France"}"#),
            ],
            10,
        );
        let found = c.filter_text("kingdom").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.as_slice()[0].key(), "GB");
        assert_eq!(found.page_size(), 10);
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let c = Collection::new(five_records(), 2);
        assert_eq!(c.filter_text("").unwrap(), c);
    }

    #[test]
    fn filter_text_propagates_decode_errors() {
        let c = Collection::new(vec![record(1, "XX", "{broken")], 10);
        assert!(matches!(c.filter_text("x"), Err(StoreError::Decode { .. })));
    }

    // -----------------------------------------------------------------------
    // Record map
    // -----------------------------------------------------------------------

    fn record_map(page_size: usize) -> RecordMapCollection {
        let mut data = IndexMap::new();
        for r in five_records() {
            data.insert(r.key(), vec![r]);
        }
        RecordMapCollection::new(data, page_size)
    }

    #[test]
    fn records_for_known_key() {
        let map = record_map(4);
        assert_eq!(map.records_for_key("CZ").unwrap().len(), 1);
    }

    #[test]
    fn records_for_unknown_key_is_key_not_found() {
        let err = record_map(4).records_for_key("FR").unwrap_err();
        assert_eq!(err, StoreError::KeyNotFound("FR".into()));
    }

    #[test]
    fn paginator_slices_by_page_size() {
        let map = record_map(4);
        let mut pages = map.paginator();
        assert_eq!(pages.next().unwrap().len(), 4);
        let last = pages.next().unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].0, "ES");
        assert!(pages.next().is_none());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let keys: Vec<_> = record_map(4).keys().map(str::to_string).collect();
        assert_eq!(keys, vec!["CZ", "GM", "GB", "US", "ES"]);
    }
}
