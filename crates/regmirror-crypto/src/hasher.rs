use regmirror_types::ItemHash;
use sha2::{Digest, Sha256};

/// SHA-256 content hasher producing `sha-256:` item addresses.
///
/// Nothing is prepended to the payload: the address must match the one the
/// remote register computes over the same bytes.
pub struct ContentHasher;

impl ContentHasher {
    /// Content address of a payload.
    pub fn hash(data: &[u8]) -> ItemHash {
        ItemHash::from_digest(&Self::raw_hash(data))
    }

    /// Content address of a text payload, hashed as its UTF-8 bytes.
    pub fn hash_str(payload: &str) -> ItemHash {
        Self::hash(payload.as_bytes())
    }

    /// Raw SHA-256 digest.
    pub fn raw_hash(data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }
}
