use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Algorithm prefix carried by every content address.
pub const HASH_PREFIX: &str = "sha-256:";

const DIGEST_HEX_LEN: usize = 64;

/// Content address of an item.
///
/// The textual form is `"sha-256:"` followed by the lowercase hex SHA-256
/// digest of the item's exact payload text. An `ItemHash` is always in
/// canonical form once constructed; entries that reference malformed hashes
/// keep them as plain strings and simply fail to resolve.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemHash(String);

impl ItemHash {
    /// Build the address from a raw 32-byte digest.
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        Self(format!("{HASH_PREFIX}{}", hex::encode(digest)))
    }

    /// Parse and validate a `sha-256:<hex>` string.
    ///
    /// Uppercase hex is accepted and normalised to lowercase.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        let digest = s
            .strip_prefix(HASH_PREFIX)
            .ok_or_else(|| TypeError::InvalidHash(s.to_string()))?;
        if digest.len() != DIGEST_HEX_LEN || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidHash(s.to_string()));
        }
        Ok(Self(format!("{HASH_PREFIX}{}", digest.to_ascii_lowercase())))
    }

    /// The full textual form, including the prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex digest without the algorithm prefix.
    pub fn digest_hex(&self) -> &str {
        &self.0[HASH_PREFIX.len()..]
    }

    /// Short form for logs: the first 8 hex characters of the digest.
    pub fn short_hex(&self) -> &str {
        &self.digest_hex()[..8]
    }
}

impl fmt::Debug for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemHash({})", self.short_hex())
    }
}

impl fmt::Display for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemHash {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ItemHash> for String {
    fn from(hash: ItemHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for ItemHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets `HashMap<ItemHash, _>` be queried with the raw `&str` carried by entries.
impl Borrow<str> for ItemHash {
    fn borrow(&self) -> &str {
        &self.0
    }
}
