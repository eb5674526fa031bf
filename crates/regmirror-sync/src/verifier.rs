use regmirror_rsf::SegmentBoundaries;
use regmirror_types::EntryNumber;
use tracing::debug;

use crate::error::IntegrityError;
use crate::types::{RegisterProof, VerifiedSegment};

/// Checks a fetched segment against the local anchor and the live proof.
///
/// This is a lightweight tamper check, not Merkle verification: it rejects a
/// remote that was rewound, reset, or rewritten, without downloading the
/// whole log again.
pub struct SegmentVerifier;

impl SegmentVerifier {
    /// Verify `segment`, fetched after user entry `user_entry_number`.
    ///
    /// `anchor` is the root hash the mirror last applied, if any. An empty
    /// segment is treated as starting and ending at the anchor.
    pub fn verify(
        anchor: Option<&str>,
        user_entry_number: EntryNumber,
        segment: &str,
        proof: &RegisterProof,
    ) -> Result<VerifiedSegment, IntegrityError> {
        if proof.total_entries < user_entry_number {
            return Err(IntegrityError::EntryCountRegression {
                local: user_entry_number,
                remote: proof.total_entries,
            });
        }

        let (begin, end) = if SegmentBoundaries::is_empty_segment(segment) {
            let end = anchor.ok_or(IntegrityError::MissingCheckpoint("end"))?;
            (end, end)
        } else {
            let bounds = SegmentBoundaries::of(segment);
            let begin = bounds.begin.ok_or(IntegrityError::MissingCheckpoint("begin"))?;
            let end = bounds.end.ok_or(IntegrityError::MissingCheckpoint("end"))?;
            (begin, end)
        };

        if let Some(anchor) = anchor {
            if anchor != begin {
                return Err(IntegrityError::RootHashMismatch {
                    expected: anchor.to_string(),
                    actual: begin.to_string(),
                });
            }
        }

        if proof.root_hash != end {
            return Err(IntegrityError::RootHashMismatch {
                expected: proof.root_hash.clone(),
                actual: end.to_string(),
            });
        }

        debug!(
            user_entry_number,
            total_entries = proof.total_entries,
            root_hash = end,
            "segment verified"
        );

        Ok(VerifiedSegment {
            begin: begin.to_string(),
            end: end.to_string(),
        })
    }
}
