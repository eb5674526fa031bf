use std::fmt;
use std::sync::{Arc, RwLock};

use regmirror_crypto::ContentHasher;
use regmirror_types::ItemHash;
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Field whose presence marks a record as expired.
pub const END_DATE_FIELD: &str = "end-date";

/// Structured value of an item: a JSON object keyed by field name.
pub type ItemValue = Map<String, Value>;

enum ItemState {
    Unparsed(String),
    Parsed(Arc<ItemValue>),
}

/// An immutable, content-addressed value.
///
/// The hash is computed once from the exact payload text. The payload is
/// kept only until the first call to [`Item::value`], which parses it,
/// caches the result, and drops the text.
pub struct Item {
    hash: ItemHash,
    state: RwLock<ItemState>,
}

impl Item {
    pub fn new(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            hash: ContentHasher::hash_str(&payload),
            state: RwLock::new(ItemState::Unparsed(payload)),
        }
    }

    pub fn hash(&self) -> &ItemHash {
        &self.hash
    }

    /// The parsed value. Every call after the first returns the same `Arc`.
    pub fn value(&self) -> StoreResult<Arc<ItemValue>> {
        if let ItemState::Parsed(value) = &*self.state.read().expect("lock poisoned") {
            return Ok(Arc::clone(value));
        }

        let mut state = self.state.write().expect("lock poisoned");
        let value = match &*state {
            ItemState::Parsed(value) => return Ok(Arc::clone(value)),
            ItemState::Unparsed(raw) => {
                let parsed: ItemValue =
                    serde_json::from_str(raw).map_err(|e| StoreError::Decode {
                        hash: self.hash.to_string(),
                        reason: e.to_string(),
                    })?;
                Arc::new(parsed)
            }
        };
        *state = ItemState::Parsed(Arc::clone(&value));
        Ok(value)
    }

    /// Whether the item carries an `end-date` field.
    ///
    /// Before the first parse this is a substring search over the raw
    /// payload, which can report `true` when the text `end-date` appears
    /// inside some other value. Once parsed, the field itself is checked.
    pub fn has_end_date(&self) -> bool {
        match &*self.state.read().expect("lock poisoned") {
            ItemState::Unparsed(raw) => raw.contains(END_DATE_FIELD),
            ItemState::Parsed(value) => value
                .get(END_DATE_FIELD)
                .is_some_and(|v| !v.is_null()),
        }
    }

    /// `true` once the payload has been parsed and released.
    pub fn is_parsed(&self) -> bool {
        matches!(&*self.state.read().expect("lock poisoned"), ItemState::Parsed(_))
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Item {}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("hash", &self.hash)
            .field("parsed", &self.is_parsed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GB: &str =
        r#"{"citizen-names":"Briton;British citizen","country":"GB","name":"United Kingdom"}"#;
    const CS_NO_END: &str =
        r#"{"citizen-names":"Czechoslovak","country":"CS","name":"Czechoslovakia"}"#;
    const CS_END: &str = r#"{"citizen-names":"Czechoslovak","country":"CS","end-date":"1992-12-31","name":"Czechoslovakia"}"#;

    // -----------------------------------------------------------------------
    // Hash
    // -----------------------------------------------------------------------

    #[test]
    fn hash_is_available_immediately() {
        let item = Item::new(GB);
        assert_eq!(
            item.hash().as_str(),
            "sha-256:0635c3f0fedd02c322db4528238a44d9bdbbf702795db33e892aab297afd97bb"
        );
        assert!(!item.is_parsed());
    }

    #[test]
    fn hash_is_stable_across_parse() {
        let item = Item::new(GB);
        let before = item.hash().clone();
        item.value().unwrap();
        assert_eq!(item.hash(), &before);
    }

    // -----------------------------------------------------------------------
    // Value
    // -----------------------------------------------------------------------

    #[test]
    fn value_parses_payload() {
        let item = Item::new(GB);
        let value = item.value().unwrap();
        assert_eq!(value.get("country"), Some(&Value::String("GB".into())));
        assert_eq!(value.len(), 3);
        assert!(item.is_parsed());
    }

    #[test]
    fn value_is_cached_and_shared() {
        let item = Item::new(GB);
        let first = item.value().unwrap();
        let second = item.value().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn invalid_json_is_a_decode_error_naming_the_hash() {
        let item = Item::new("{not json");
        let err = item.value().unwrap_err();
        match err {
            StoreError::Decode { hash, .. } => assert_eq!(hash, item.hash().to_string()),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!item.is_parsed());
    }

    #[test]
    fn non_object_json_is_a_decode_error() {
        assert!(matches!(Item::new("[1,2]").value(), Err(StoreError::Decode { .. })));
    }

    // -----------------------------------------------------------------------
    // End date
    // -----------------------------------------------------------------------

    #[test]
    fn end_date_before_parse() {
        assert!(!Item::new(CS_NO_END).has_end_date());
        assert!(Item::new(CS_END).has_end_date());
    }

    #[test]
    fn end_date_after_parse() {
        let without = Item::new(CS_NO_END);
        without.value().unwrap();
        assert!(!without.has_end_date());

        let with = Item::new(CS_END);
        with.value().unwrap();
        assert!(with.has_end_date());
    }

    #[test]
    fn substring_fast_path_can_over_report() {
        let item = Item::new(r#"{"text":"see end-date field"}"#);
        assert!(item.has_end_date());
        item.value().unwrap();
        assert!(!item.has_end_date());
    }

    // -----------------------------------------------------------------------
    // Equality
    // -----------------------------------------------------------------------

    #[test]
    fn equality_is_by_content_address() {
        assert_eq!(Item::new(GB), Item::new(GB));
        assert_ne!(Item::new(GB), Item::new(CS_END));
    }
}
