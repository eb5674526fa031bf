use std::sync::Arc;
use std::time::Instant;

use regmirror_store::{
    Collection, DataStore, Entry, EntryCollection, InMemoryDataStore, Item, ItemCollection,
    Record, RecordCollection, RecordMapCollection,
};
use regmirror_sync::{RefreshReport, RemoteTransport, SegmentLoader, SegmentVerifier};
use regmirror_types::{EntryNumber, Partition};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

const REGISTER_KEY_PREFIX: &str = "register:";
const FIELD_KEY_PREFIX: &str = "field:";
const CUSTODIAN_KEY: &str = "custodian";

/// A verified local mirror of one register.
///
/// Construction performs a full refresh, so a client is never observed
/// before its first sync. Queries read the store and never touch the
/// network; only [`refresh_data`](Self::refresh_data) does.
pub struct RegisterClient<S: DataStore = InMemoryDataStore> {
    transport: Arc<dyn RemoteTransport>,
    store: S,
    last_refreshed: Instant,
}

impl RegisterClient<InMemoryDataStore> {
    /// Mirror the register behind `transport` into a fresh in-memory store.
    pub async fn connect(
        transport: Arc<dyn RemoteTransport>,
        page_size: usize,
    ) -> ClientResult<Self> {
        Self::with_store(transport, InMemoryDataStore::with_page_size(page_size)).await
    }
}

impl<S: DataStore> RegisterClient<S> {
    /// Mirror the register into `store`, refreshing once before returning.
    pub async fn with_store(transport: Arc<dyn RemoteTransport>, store: S) -> ClientResult<Self> {
        let mut client = Self {
            transport,
            store,
            last_refreshed: Instant::now(),
        };
        client.refresh_data().await?;
        Ok(client)
    }

    /// Fetch, verify, and apply everything after the last known user entry.
    ///
    /// Verification happens before any mutation: on error the store is
    /// exactly as it was before the call.
    pub async fn refresh_data(&mut self) -> ClientResult<RefreshReport> {
        let user_entry_number = self.store.latest_entry_number(Partition::User);
        let anchor = self.store.latest_root_hash().map(str::to_string);

        let segment = self.transport.fetch_segment(user_entry_number).await?;
        let proof = self.transport.fetch_proof().await?;

        let verified = SegmentVerifier::verify(anchor.as_deref(), user_entry_number, &segment, &proof)
            .inspect_err(|e| warn!(error = %e, user_entry_number, "refresh rejected"))?;
        debug!(begin = %verified.begin, end = %verified.end, "applying segment");

        let report = SegmentLoader::apply(&mut self.store, &segment)?;
        self.last_refreshed = Instant::now();

        info!(
            items = report.items_added,
            user_entries = report.user_entries_appended,
            system_entries = report.system_entries_appended,
            latest_user_entry = report.latest_user_entry,
            root_hash = ?report.root_hash,
            "register refreshed"
        );
        Ok(report)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// When the last successful refresh finished.
    pub fn last_refreshed(&self) -> Instant {
        self.last_refreshed
    }

    pub fn page_size(&self) -> usize {
        self.store.page_size()
    }

    pub fn latest_entry_number(&self) -> EntryNumber {
        self.store.latest_entry_number(Partition::User)
    }

    pub fn latest_root_hash(&self) -> Option<&str> {
        self.store.latest_root_hash()
    }

    // ---- Items and entries ----

    pub fn item(&self, hash: &str) -> Option<Arc<Item>> {
        self.store.item(hash)
    }

    pub fn items(&self) -> ItemCollection {
        self.store.items()
    }

    /// User entry by number.
    pub fn entry(&self, entry_number: EntryNumber) -> Option<Arc<Entry>> {
        self.store.entry(Partition::User, entry_number)
    }

    /// User entries numbered strictly after `since`.
    pub fn entries(&self, since: EntryNumber) -> EntryCollection {
        let all = self.store.entries(Partition::User);
        if since == 0 {
            return all;
        }
        all.filter(|e| e.entry_number() > since)
    }

    // ---- Records ----

    pub fn record(&self, key: &str) -> Option<Record> {
        self.store.record(Partition::User, key)
    }

    pub fn records(&self) -> RecordCollection {
        self.store.records(Partition::User)
    }

    pub fn metadata_records(&self) -> RecordCollection {
        self.store.records(Partition::System)
    }

    /// Full history of every user key with an entry numbered after `since`.
    pub fn records_with_history(&self, since: EntryNumber) -> RecordMapCollection {
        self.history_since(Partition::User, since)
    }

    /// Full history of every system key with an entry numbered after `since`.
    pub fn metadata_records_with_history(&self, since: EntryNumber) -> RecordMapCollection {
        self.history_since(Partition::System, since)
    }

    /// Records whose item has no `end-date`.
    pub fn current_records(&self) -> RecordCollection {
        self.records().filter(|r| !r.is_expired())
    }

    /// Records whose item carries an `end-date`.
    pub fn expired_records(&self) -> RecordCollection {
        self.records().filter(Record::is_expired)
    }

    // ---- Register metadata ----

    /// The system record describing the register itself.
    pub fn register_definition(&self) -> Option<Record> {
        self.metadata_records()
            .into_iter()
            .find(|r| r.key().starts_with(REGISTER_KEY_PREFIX))
    }

    pub fn custodian(&self) -> Option<Record> {
        self.store.record(Partition::System, CUSTODIAN_KEY)
    }

    /// Field definitions in the order the register definition declares them.
    ///
    /// A declared field without a `field:<name>` record yields `None` in its
    /// slot rather than being dropped.
    pub fn field_definitions(&self) -> ClientResult<Collection<Option<Record>>> {
        let definition = self.register_definition().ok_or_else(|| {
            ClientError::InvalidRegisterDefinition("no register definition record".into())
        })?;
        let item = definition.item().ok_or_else(|| {
            ClientError::InvalidRegisterDefinition(format!(
                "item {} for {} is missing",
                definition.entry().item_hash(),
                definition.key()
            ))
        })?;
        let value = item.value()?;

        let names = match value.get("fields") {
            Some(Value::Array(names)) => names,
            _ => {
                return Err(ClientError::InvalidRegisterDefinition(format!(
                    "{} has no fields list",
                    definition.key()
                )))
            }
        };

        let mut definitions = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_str().ok_or_else(|| {
                ClientError::InvalidRegisterDefinition(format!("field name {name} is not a string"))
            })?;
            let record = self
                .store
                .record(Partition::System, &format!("{FIELD_KEY_PREFIX}{name}"));
            if record.is_none() {
                debug!(field = name, "declared field has no definition");
            }
            definitions.push(record);
        }
        Ok(Collection::new(definitions, self.page_size()))
    }

    fn history_since(&self, partition: Partition, since: EntryNumber) -> RecordMapCollection {
        let all = self.store.records_with_history(partition);
        if since == 0 {
            return all;
        }
        let data = all
            .iter()
            .filter(|(_, history)| history.iter().any(|r| r.entry().entry_number() > since))
            .map(|(key, history)| (key.to_string(), history.to_vec()))
            .collect();
        RecordMapCollection::new(data, all.page_size())
    }
}

impl<S: DataStore + std::fmt::Debug> std::fmt::Debug for RegisterClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterClient")
            .field("store", &self.store)
            .field("last_refreshed", &self.last_refreshed)
            .finish()
    }
}
