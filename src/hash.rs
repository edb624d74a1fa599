//! Content hashing for version tokens using blake3.
//!
//! Tokens identify *source* bytes: an asset hashes its raw content, a bundle
//! hashes the ordered sequence of its assets' digests. Processor output never
//! feeds into a token.

use std::fmt;

/// Number of hex characters used in a version token.
pub const TOKEN_LEN: usize = 16;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash a byte slice.
    pub fn of(data: impl AsRef<[u8]>) -> Self {
        Self(*blake3::hash(data.as_ref()).as_bytes())
    }

    /// Hash the ordered concatenation of other digests.
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a ContentHash>) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part.as_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Short hex form embedded in versioned URLs.
    pub fn token(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(TOKEN_LEN);
        hex
    }

    /// Check a token taken from a URL against this hash.
    pub fn matches_token(&self, token: &str) -> bool {
        token.len() == TOKEN_LEN && self.token() == token
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}
