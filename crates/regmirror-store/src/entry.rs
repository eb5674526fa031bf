use std::fmt;
use std::sync::{Arc, RwLock};

use regmirror_types::{EntryNumber, Partition};

/// Fields read from an `append-entry` line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryFields {
    pub key: String,
    pub timestamp: String,
    pub item_hash: String,
}

impl EntryFields {
    /// Split an RSF line by fixed tab position:
    /// command, partition, key, timestamp, item-hash.
    ///
    /// Missing positions read as empty strings.
    fn parse(line: &str) -> Self {
        let mut fields = line.split('\t').skip(2);
        let mut next = || fields.next().unwrap_or_default().to_string();
        let key = next();
        let timestamp = next();
        let item_hash = next();
        Self {
            key,
            timestamp,
            item_hash,
        }
    }
}

enum EntryState {
    Unparsed(String),
    Parsed(Arc<EntryFields>),
}

/// One append-only assertion binding a key to an item hash.
///
/// The entry number and partition are assigned by whoever applies the log;
/// the remaining fields are parsed from the raw line on first access, after
/// which the line is dropped. Appending to a store indexes the entry by key,
/// which forces that parse.
pub struct Entry {
    entry_number: EntryNumber,
    partition: Partition,
    state: RwLock<EntryState>,
}

impl Entry {
    pub fn new(line: impl Into<String>, entry_number: EntryNumber, partition: Partition) -> Self {
        Self {
            entry_number,
            partition,
            state: RwLock::new(EntryState::Unparsed(line.into())),
        }
    }

    pub fn entry_number(&self) -> EntryNumber {
        self.entry_number
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn key(&self) -> String {
        self.fields().key.clone()
    }

    pub fn timestamp(&self) -> String {
        self.fields().timestamp.clone()
    }

    pub fn item_hash(&self) -> String {
        self.fields().item_hash.clone()
    }

    /// All parsed fields. Every call after the first returns the same `Arc`.
    pub fn fields(&self) -> Arc<EntryFields> {
        if let EntryState::Parsed(fields) = &*self.state.read().expect("lock poisoned") {
            return Arc::clone(fields);
        }

        let mut state = self.state.write().expect("lock poisoned");
        let fields = match &*state {
            EntryState::Parsed(fields) => return Arc::clone(fields),
            EntryState::Unparsed(line) => Arc::new(EntryFields::parse(line)),
        };
        *state = EntryState::Parsed(Arc::clone(&fields));
        fields
    }

    /// `true` once the raw line has been parsed and released.
    pub fn is_parsed(&self) -> bool {
        matches!(&*self.state.read().expect("lock poisoned"), EntryState::Parsed(_))
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.entry_number == other.entry_number
            && self.partition == other.partition
            && self.fields() == other.fields()
    }
}

impl Eq for Entry {}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("entry_number", &self.entry_number)
            .field("partition", &self.partition)
            .field("parsed", &self.is_parsed())
            .finish()
    }
}
