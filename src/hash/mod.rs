//! Content hashing for diagnostics.
//!
//! - [`Sha256Hasher`] - incremental SHA-256 producing a [`crate::Fingerprint`]

mod sha256;

pub use sha256::Sha256Hasher;
