//! SHA-256 fingerprinting of whole input streams.

use sha2::{Digest, Sha256};

use crate::chunk::Fingerprint;

/// An incremental SHA-256 hasher fed one read at a time.
#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    state: Sha256,
}

impl Sha256Hasher {
    /// Creates a new hasher.
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
        }
    }

    /// Updates the hasher with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Finalizes and returns the fingerprint.
    pub fn finalize(self) -> Fingerprint {
        let digest = self.state.finalize();
        let mut bytes = [0u8; Fingerprint::SIZE];
        bytes.copy_from_slice(&digest);
        Fingerprint::new(bytes)
    }

    /// Convenience method to fingerprint data in one shot.
    pub fn hash(data: &[u8]) -> Fingerprint {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }
}
