//! Pipeline engine - one codec driven by `push()`/`finish()`.
//!
//! [`Pipeline`] owns a single [`Codec`] for the lifetime of one stream:
//!
//! - `push()` - Transform one block of input into one output chunk
//! - `finish()` - Flush the codec and consume the pipeline
//!
//! # Example
//!
//! ```
//! use thrunting_tools::{Deflate, Inflate, Pipeline};
//!
//! let mut deflate = Pipeline::new(Deflate::default());
//! let mut compressed = deflate.push(b"first ")?.into_data().to_vec();
//! compressed.extend_from_slice(&deflate.push(b"second")?.into_data());
//! compressed.extend_from_slice(&deflate.finish()?.into_data());
//!
//! let mut inflate = Pipeline::new(Inflate::new());
//! let mut plain = inflate.push(&compressed)?.into_data().to_vec();
//! plain.extend_from_slice(&inflate.finish()?.into_data());
//! assert_eq!(plain, b"first second");
//! # Ok::<(), thrunting_tools::ToolError>(())
//! ```

use crate::chunk::Chunk;
use crate::codec::Codec;
use crate::error::ToolError;

/// A codec together with the stream position it has reached.
///
/// `finish` takes `self`, so a pipeline cannot be fed again once its codec
/// has been flushed.
#[derive(Debug)]
pub struct Pipeline<C> {
    codec: C,
    consumed: u64,
    offset: u64,
}

impl<C: Codec> Pipeline<C> {
    /// Creates a pipeline around a fresh codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec,
            consumed: 0,
            offset: 0,
        }
    }

    fn emit(&mut self, out: Vec<u8>) -> Chunk {
        let chunk = Chunk::new(out, self.offset);
        self.offset += chunk.len() as u64;
        chunk
    }

    /// Transforms one block of input.
    ///
    /// The returned chunk may be empty when the codec buffers internally.
    pub fn push(&mut self, data: &[u8]) -> Result<Chunk, ToolError> {
        let mut out = Vec::new();
        self.codec.transform(data, &mut out)?;
        self.consumed += data.len() as u64;
        Ok(self.emit(out))
    }

    /// Flushes the codec at end-of-stream and returns its trailing output.
    pub fn finish(mut self) -> Result<Chunk, ToolError> {
        let mut out = Vec::new();
        self.codec.finish(&mut out)?;
        Ok(self.emit(out))
    }

    /// Returns the number of input bytes pushed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns the output offset of the next chunk.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns the codec's name.
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }
}
