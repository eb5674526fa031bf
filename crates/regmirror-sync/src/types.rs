use serde::{Deserialize, Serialize};
use regmirror_types::EntryNumber;

/// The register's live `merkle:sha-256` proof.
///
/// Only the entry count and root hash are used; Merkle paths are not
/// verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegisterProof {
    pub total_entries: EntryNumber,
    pub root_hash: String,
}

impl RegisterProof {
    pub fn new(total_entries: EntryNumber, root_hash: impl Into<String>) -> Self {
        Self { total_entries, root_hash: root_hash.into() }
    }
}

/// Boundary checkpoints of a segment that passed verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedSegment {
    /// Root hash the segment starts from.
    pub begin: String,
    /// Root hash the mirror holds once the segment is applied.
    pub end: String,
}

/// What a single refresh changed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub items_added: usize,
    pub user_entries_appended: usize,
    pub system_entries_appended: usize,
    pub latest_user_entry: EntryNumber,
    pub latest_system_entry: EntryNumber,
    pub root_hash: Option<String>,
}

impl RefreshReport {
    /// `true` when the segment carried no items or entries.
    pub fn is_noop(&self) -> bool {
        self.items_added == 0 && self.user_entries_appended == 0 && self.system_entries_appended == 0
    }
}
