//! Content fingerprint type.

use std::fmt;

/// A SHA-256 digest identifying a whole input stream.
///
/// Used in diagnostics for rejected inputs so an analyst can look the sample
/// up later without keeping the bytes around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; Fingerprint::SIZE]);

impl Fingerprint {
    /// Digest length in bytes.
    pub const SIZE: usize = 32;

    pub(crate) const fn new(digest: [u8; Self::SIZE]) -> Self {
        Self(digest)
    }

    /// Lowercase hex, as printed by `sha256sum`.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{:02x}", byte))
    }
}
