//! Content addressing for the register mirror.
//!
//! Items are addressed by the SHA-256 digest of their exact payload text.
//! Hashing is delegated to the `sha2` crate.

pub mod hasher;

pub use hasher::ContentHasher;
