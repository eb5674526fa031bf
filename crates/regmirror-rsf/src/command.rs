use std::fmt;

use regmirror_types::Partition;

pub const ADD_ITEM: &str = "add-item";
pub const APPEND_ENTRY: &str = "append-entry";
pub const ASSERT_ROOT_HASH: &str = "assert-root-hash";

/// One decoded RSF line, borrowing from the segment text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RsfCommand<'a> {
    /// `add-item <payload>`: the literal item payload text.
    AddItem { payload: &'a str },
    /// `append-entry <partition> <key> <timestamp> <item-hash>`.
    ///
    /// Only the partition is decoded eagerly; the full line is handed on so
    /// the entry can parse its remaining fields on first access.
    AppendEntry { partition: Partition, line: &'a str },
    /// `assert-root-hash <hash>`: a checkpoint of the log state.
    AssertRootHash { hash: &'a str },
}

impl RsfCommand<'_> {
    /// The command name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            RsfCommand::AddItem { .. } => ADD_ITEM,
            RsfCommand::AppendEntry { .. } => APPEND_ENTRY,
            RsfCommand::AssertRootHash { .. } => ASSERT_ROOT_HASH,
        }
    }
}

impl fmt::Display for RsfCommand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsfCommand::AddItem { payload } => write!(f, "{ADD_ITEM}\t{payload}"),
            RsfCommand::AppendEntry { line, .. } => f.write_str(line),
            RsfCommand::AssertRootHash { hash } => write!(f, "{ASSERT_ROOT_HASH}\t{hash}"),
        }
    }
}
