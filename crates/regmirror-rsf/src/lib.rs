//! Register Serialisation Format (RSF) codec.
//!
//! A register log segment is newline-separated text. Each line is
//! tab-separated and starts with a command name:
//!
//! ```text
//! assert-root-hash\tsha-256:<hex>
//! add-item\t{"country":"GB","name":"United Kingdom"}
//! append-entry\tuser\tGB\t2016-04-05T13:23:05Z\tsha-256:<hex>
//! assert-root-hash\tsha-256:<hex>
//! ```
//!
//! Decoding borrows from the segment text and never builds items or
//! entries itself; callers decide what to materialise.

pub mod command;
pub mod decoder;
pub mod segment;

pub use command::{RsfCommand, ADD_ITEM, APPEND_ENTRY, ASSERT_ROOT_HASH};
pub use decoder::RsfDecoder;
pub use segment::{SegmentBoundaries, SegmentBuilder};
