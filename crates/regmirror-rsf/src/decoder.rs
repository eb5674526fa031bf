use std::str::Lines;

use regmirror_types::Partition;
use tracing::{trace, warn};

use crate::command::{RsfCommand, ADD_ITEM, APPEND_ENTRY, ASSERT_ROOT_HASH};

/// Streaming decoder over a segment's lines.
///
/// Blank lines and unknown commands are skipped so newer registers can add
/// commands without breaking older mirrors. Missing fields decode as empty
/// strings rather than failing.
pub struct RsfDecoder<'a> {
    lines: Lines<'a>,
    line_no: usize,
}

impl<'a> RsfDecoder<'a> {
    pub fn new(segment: &'a str) -> Self {
        Self {
            lines: segment.lines(),
            line_no: 0,
        }
    }

    /// Decode a single line. Returns `None` for lines that carry no command.
    pub fn decode_line(line: &'a str) -> Option<RsfCommand<'a>> {
        let mut fields = line.split('\t');
        let command = fields.next()?;
        match command {
            ADD_ITEM => Some(RsfCommand::AddItem {
                payload: fields.next().unwrap_or(""),
            }),
            APPEND_ENTRY => {
                let token = fields.next().unwrap_or("");
                match token.parse::<Partition>() {
                    Ok(partition) => Some(RsfCommand::AppendEntry { partition, line }),
                    Err(e) => {
                        warn!(error = %e, "skipping append-entry with unknown partition");
                        None
                    }
                }
            }
            ASSERT_ROOT_HASH => Some(RsfCommand::AssertRootHash {
                hash: fields.next().unwrap_or(""),
            }),
            other => {
                trace!(command = other, "ignoring unrecognised RSF command");
                None
            }
        }
    }

    /// Number of lines consumed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }
}

impl<'a> Iterator for RsfDecoder<'a> {
    type Item = RsfCommand<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            if line.is_empty() {
                continue;
            }
            if let Some(cmd) = Self::decode_line(line) {
                return Some(cmd);
            }
        }
    }
}
