use regmirror_types::Partition;

use crate::command::{RsfCommand, ADD_ITEM, APPEND_ENTRY, ASSERT_ROOT_HASH};
use crate::decoder::RsfDecoder;

/// Root hashes asserted on a segment's first and last lines.
///
/// A well-formed segment from the register begins and ends with
/// `assert-root-hash`. Either side is `None` when the corresponding line is
/// some other command (or the segment is empty).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentBoundaries<'a> {
    pub begin: Option<&'a str>,
    pub end: Option<&'a str>,
}

impl<'a> SegmentBoundaries<'a> {
    /// Read the boundary checkpoints without decoding the body.
    pub fn of(segment: &'a str) -> Self {
        let mut lines = segment.lines().filter(|l| !l.is_empty());
        let first = lines.next();
        let last = lines.next_back().or(first);
        Self {
            begin: first.and_then(root_hash_of),
            end: last.and_then(root_hash_of),
        }
    }

    /// `true` when the segment had no non-blank lines at all.
    pub fn is_empty_segment(segment: &str) -> bool {
        segment.lines().all(str::is_empty)
    }
}

fn root_hash_of(line: &str) -> Option<&str> {
    match RsfDecoder::decode_line(line) {
        Some(RsfCommand::AssertRootHash { hash }) => Some(hash),
        _ => None,
    }
}

/// Builds RSF segment text line by line.
///
/// Used to serve segments from in-memory transports and to assemble
/// fixtures; the register itself is the only real producer of RSF.
#[derive(Clone, Debug, Default)]
pub struct SegmentBuilder {
    text: String,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assert_root_hash(mut self, hash: &str) -> Self {
        self.push_line(&[ASSERT_ROOT_HASH, hash]);
        self
    }

    pub fn add_item(mut self, payload: &str) -> Self {
        self.push_line(&[ADD_ITEM, payload]);
        self
    }

    pub fn append_entry(
        mut self,
        partition: Partition,
        key: &str,
        timestamp: &str,
        item_hash: &str,
    ) -> Self {
        self.push_line(&[APPEND_ENTRY, partition.as_str(), key, timestamp, item_hash]);
        self
    }

    /// Append a raw line verbatim (for malformed-input tests).
    pub fn raw_line(mut self, line: &str) -> Self {
        self.text.push_str(line);
        self.text.push('\n');
        self
    }

    pub fn build(self) -> String {
        self.text
    }

    fn push_line(&mut self, fields: &[&str]) {
        self.text.push_str(&fields.join("\t"));
        self.text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        SegmentBuilder::new()
            .assert_root_hash("sha-256:begin")
            .add_item("{\"name\":\"country\"}")
            .append_entry(Partition::System, "name", "2017-07-17T10:59:47Z", "sha-256:abcd")
            .assert_root_hash("sha-256:end")
            .build()
    }

    #[test]
    fn boundaries_of_well_formed_segment() {
        let segment = sample();
        let b = SegmentBoundaries::of(&segment);
        assert_eq!(b.begin, Some("sha-256:begin"));
        assert_eq!(b.end, Some("sha-256:end"));
    }

    #[test]
    fn checkpoint_only_segment_has_same_begin_and_end() {
        let segment = SegmentBuilder::new().assert_root_hash("sha-256:only").build();
        let b = SegmentBoundaries::of(&segment);
        assert_eq!(b.begin, Some("sha-256:only"));
        assert_eq!(b.end, Some("sha-256:only"));
    }

    #[test]
    fn missing_checkpoints_are_none() {
        let segment = SegmentBuilder::new().add_item("{}").build();
        assert_eq!(SegmentBoundaries::of(&segment), SegmentBoundaries::default());
    }

    #[test]
    fn trailing_blank_lines_do_not_hide_last_checkpoint() {
        let segment = format!("{}\n\n", sample());
        assert_eq!(SegmentBoundaries::of(&segment).end, Some("sha-256:end"));
    }

    #[test]
    fn empty_segment_detection() {
        assert!(SegmentBoundaries::is_empty_segment(""));
        assert!(SegmentBoundaries::is_empty_segment("\n\n"));
        assert!(!SegmentBoundaries::is_empty_segment(&sample()));
    }

    #[test]
    fn builder_output_decodes() {
        let segment = sample();
        let names: Vec<_> = RsfDecoder::new(&segment).map(|c| c.name()).collect();
        assert_eq!(names, vec!["assert-root-hash", "add-item", "append-entry", "assert-root-hash"]);
    }
}
