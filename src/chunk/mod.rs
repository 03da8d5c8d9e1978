//! Chunk types.
//!
//! - [`Chunk`] - Transformed output with its offset in the output stream
//! - [`Fingerprint`] - 32-byte SHA-256 digest of a whole input

mod data;
mod fingerprint;

pub use data::Chunk;
pub use fingerprint::Fingerprint;
