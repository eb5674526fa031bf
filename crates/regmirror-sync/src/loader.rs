use regmirror_rsf::{RsfCommand, RsfDecoder};
use regmirror_store::{DataStore, Entry, Item, StoreResult};
use regmirror_types::Partition;
use tracing::debug;

use crate::types::RefreshReport;

/// Applies a verified segment to a store.
pub struct SegmentLoader;

impl SegmentLoader {
    /// Decode `segment` and apply every command in order.
    ///
    /// Entries are numbered from each partition's current latest entry, so
    /// the store must not change between verification and loading. Calls
    /// `after_load` once at the end.
    pub fn apply<S: DataStore + ?Sized>(store: &mut S, segment: &str) -> StoreResult<RefreshReport> {
        let mut report = RefreshReport::default();
        let mut decoder = RsfDecoder::new(segment);

        for command in decoder.by_ref() {
            match command {
                RsfCommand::AddItem { payload } => {
                    store.add_item(Item::new(payload));
                    report.items_added += 1;
                }
                RsfCommand::AppendEntry { partition, line } => {
                    let next = store.latest_entry_number(partition) + 1;
                    store.append_entry(Entry::new(line, next, partition))?;
                    match partition {
                        Partition::User => report.user_entries_appended += 1,
                        Partition::System => report.system_entries_appended += 1,
                    }
                }
                RsfCommand::AssertRootHash { hash } => store.update_root_hash(hash),
            }
        }

        store.after_load();

        report.latest_user_entry = store.latest_entry_number(Partition::User);
        report.latest_system_entry = store.latest_entry_number(Partition::System);
        report.root_hash = store.latest_root_hash().map(str::to_string);

        debug!(
            lines = decoder.lines_read(),
            items = report.items_added,
            user_entries = report.user_entries_appended,
            system_entries = report.system_entries_appended,
            "segment loaded"
        );
        Ok(report)
    }
}
