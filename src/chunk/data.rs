//! The Chunk type - one step of transformed output.

use bytes::Bytes;

/// A piece of transformed output and where it starts in the output stream.
///
/// A chunk may be empty: deflate, for one, buffers internally and often
/// produces nothing for a given input block.
///
/// # Example
///
/// ```
/// use thrunting_tools::{Pipeline, UrlEncode};
///
/// let mut pipeline = Pipeline::new(UrlEncode::default());
/// let first = pipeline.push(b"a b")?;
/// let second = pipeline.push(b"c")?;
///
/// assert_eq!(first.range(), 0..5);
/// assert_eq!(second.start(), first.end());
/// # Ok::<(), thrunting_tools::ToolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// The transformed bytes.
    pub data: Bytes,

    /// Offset of the first byte in the output stream.
    pub offset: u64,
}

impl Chunk {
    pub(crate) fn new(data: impl Into<Bytes>, offset: u64) -> Self {
        Self {
            data: data.into(),
            offset,
        }
    }

    /// Returns the number of output bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if this step produced no output.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the start offset.
    pub fn start(&self) -> u64 {
        self.offset
    }

    /// Returns the end offset (exclusive).
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }

    /// Returns the output range covered by this chunk.
    pub fn range(&self) -> std::ops::Range<u64> {
        self.start()..self.end()
    }

    /// Consumes the chunk and returns its bytes.
    pub fn into_data(self) -> Bytes {
        self.data
    }
}
