//! Lazy chunk production - ChunkIter.
//!
//! [`ChunkIter`] reads a [`std::io::Read`] source in bounded blocks and yields
//! one transformed [`Chunk`] per read. The first zero-length read ends the
//! stream: the codec is flushed once and its output is the last item.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use thrunting_tools::{ChunkIter, CodecConfig, UrlEncode};
//!
//! let chunks = ChunkIter::new(Cursor::new("a b"), UrlEncode::default(), &CodecConfig::default())?;
//! let out: Vec<u8> = chunks
//!     .map(|chunk| chunk.map(|c| c.into_data()))
//!     .collect::<Result<Vec<_>, _>>()?
//!     .concat();
//! assert_eq!(out, b"a%20b");
//! # Ok::<(), thrunting_tools::ToolError>(())
//! ```

use std::io::Read;

use crate::buffer::Buffer;
use crate::chunk::Chunk;
use crate::codec::Codec;
use crate::config::CodecConfig;
use crate::error::ToolError;
use crate::stream::Pipeline;
use crate::util::read_retrying;

/// An iterator that yields transformed chunks from a reader.
///
/// Single-pass: the reader and the codec state are consumed as it advances.
/// After the flush chunk, or after the first error, it yields `None`.
pub struct ChunkIter<R, C> {
    reader: R,
    pipeline: Option<Pipeline<C>>,
    buffer: Buffer,
}

impl<R: Read, C: Codec> ChunkIter<R, C> {
    /// Creates a chunk iterator.
    ///
    /// # Arguments
    ///
    /// * `reader` - The source stream
    /// * `codec` - A fresh codec, owned by this iterator until the flush
    /// * `config` - Read size
    ///
    /// Returns error if the config is invalid.
    pub fn new(reader: R, codec: C, config: &CodecConfig) -> Result<Self, ToolError> {
        config.validate()?;
        Ok(Self {
            reader,
            pipeline: Some(Pipeline::new(codec)),
            buffer: Buffer::take(config.chunk_size()),
        })
    }

    /// Returns true once the stream has been flushed or has failed.
    pub fn is_finished(&self) -> bool {
        self.pipeline.is_none()
    }
}

impl<R: Read, C: Codec> Iterator for ChunkIter<R, C> {
    type Item = Result<Chunk, ToolError>;

    fn next(&mut self) -> Option<Self::Item> {
        let pipeline = self.pipeline.as_mut()?;

        let n = match read_retrying(&mut self.reader, self.buffer.as_mut_slice()) {
            Ok(n) => n,
            Err(e) => {
                self.pipeline = None;
                return Some(Err(e.into()));
            }
        };

        if n == 0 {
            // End of stream - flush exactly once
            return self.pipeline.take().map(Pipeline::finish);
        }

        let result = pipeline.push(self.buffer.filled(n));
        if result.is_err() {
            self.pipeline = None;
        }
        Some(result)
    }
}

impl<R: Read, C: Codec> std::iter::FusedIterator for ChunkIter<R, C> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Deflate, Inflate, UrlEncode};
    use std::io::{self, Cursor};

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_empty_input_yields_only_flush() {
        let config = CodecConfig::default();
        let chunks: Vec<_> = ChunkIter::new(Cursor::new(b""), UrlEncode::default(), &config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_empty());
    }

    #[test]
    fn test_one_chunk_per_read_plus_flush() {
        let config = CodecConfig::new(4).unwrap();
        let chunks: Vec<_> =
            ChunkIter::new(Cursor::new(b"abcdefghij"), UrlEncode::default(), &config)
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();

        // 4 + 4 + 2 bytes, then the flush
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[2].data.as_ref(), b"ij");
        assert!(chunks[3].is_empty());
    }

    #[test]
    fn test_deflate_flush_carries_the_stream() {
        let config = CodecConfig::default();
        let chunks: Vec<_> = ChunkIter::new(Cursor::new(b"tiny"), Deflate::default(), &config)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(!chunks[1].is_empty());
    }

    #[test]
    fn test_read_error_is_yielded_once() {
        let config = CodecConfig::default();
        let mut iter = ChunkIter::new(FailingReader, UrlEncode::default(), &config).unwrap();

        assert!(matches!(iter.next(), Some(Err(ToolError::Io(_)))));
        assert!(iter.is_finished());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_codec_error_stops_iteration() {
        let config = CodecConfig::default();
        let mut iter = ChunkIter::new(Cursor::new(b"not zlib"), Inflate::new(), &config).unwrap();

        assert!(matches!(iter.next(), Some(Err(ToolError::Codec { .. }))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_none_after_flush() {
        let config = CodecConfig::default();
        let mut iter = ChunkIter::new(Cursor::new(b"x"), UrlEncode::default(), &config).unwrap();
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let config = CodecConfig::default().with_chunk_size(0);
        let result = ChunkIter::new(Cursor::new(b"hello world"), UrlEncode::default(), &config);
        assert!(matches!(result, Err(ToolError::InvalidConfig { .. })));
    }
}
