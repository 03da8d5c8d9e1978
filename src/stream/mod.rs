//! Streaming transforms over bounded reads.
//!
//! - [`Pipeline`] - One codec with a `push()`/`finish()` API
//! - [`ChunkIter`] - Lazy transformed chunks from a reader
//! - [`RecordIter`] - Lazy delimiter-split records from a reader
//! - [`consume`] / [`transform`] - Drive a chunk sequence into a writer

mod engine;
mod iter;
mod records;
mod sink;

use std::io::Read;

use crate::codec::Codec;
use crate::config::CodecConfig;
use crate::error::ToolError;

pub use engine::Pipeline;
pub use iter::ChunkIter;
pub use records::RecordIter;
pub use sink::{consume, transform};

/// Lazily transforms `reader` with `codec`, one chunk per read.
///
/// Returns error if the config is invalid.
pub fn produce_chunks<R: Read, C: Codec>(
    reader: R,
    codec: C,
    config: &CodecConfig,
) -> Result<ChunkIter<R, C>, ToolError> {
    ChunkIter::new(reader, codec, config)
}

/// Lazily splits `reader` on `delimiter`.
pub fn produce_delimited<R: Read>(
    reader: R,
    delimiter: &str,
    config: &CodecConfig,
) -> Result<RecordIter<R>, ToolError> {
    RecordIter::delimited(reader, delimiter, config)
}
