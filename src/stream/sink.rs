//! Writing produced chunks to an output sink.

use std::io::{Read, Write};

use log::debug;

use crate::chunk::Chunk;
use crate::codec::Codec;
use crate::config::CodecConfig;
use crate::error::ToolError;
use crate::stream::ChunkIter;

/// Writes each chunk as it is produced, then flushes the writer.
///
/// Returns the total number of bytes written. On error, chunks written
/// before the failure stay in the sink.
pub fn consume<W, I>(writer: &mut W, chunks: I) -> Result<u64, ToolError>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Result<Chunk, ToolError>>,
{
    let mut total = 0u64;
    for chunk in chunks {
        let chunk = chunk?;
        writer.write_all(&chunk.data)?;
        total += chunk.len() as u64;
    }
    writer.flush()?;
    Ok(total)
}

/// Runs `codec` over the whole of `reader` into `writer`.
pub fn transform<R, W, C>(
    reader: R,
    writer: &mut W,
    codec: C,
    config: &CodecConfig,
) -> Result<u64, ToolError>
where
    R: Read,
    W: Write + ?Sized,
    C: Codec,
{
    let name = codec.name();
    let written = consume(writer, ChunkIter::new(reader, codec, config)?)?;
    debug!("{}: wrote {} bytes", name, written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Deflate, Inflate, UrlDecode, UrlEncode};
    use std::io::{self, Cursor};

    struct FullSink {
        accepted: Vec<u8>,
        capacity: usize,
    }

    impl Write for FullSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.capacity - self.accepted.len();
            if room == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            let n = room.min(buf.len());
            self.accepted.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_transform_counts_bytes() {
        let mut out = Vec::new();
        let config = CodecConfig::default();
        let n = transform(Cursor::new(b"a b"), &mut out, UrlEncode::default(), &config).unwrap();
        assert_eq!(n, 5);
        assert_eq!(out, b"a%20b");
    }

    #[test]
    fn test_zlib_roundtrip_small_reads() {
        let data = b"abcabcabc-0123456789".repeat(100);
        let config = CodecConfig::new(7).unwrap();

        let mut compressed = Vec::new();
        transform(&data[..], &mut compressed, Deflate::default(), &config).unwrap();
        let mut plain = Vec::new();
        transform(&compressed[..], &mut plain, Inflate::new(), &config).unwrap();

        assert_eq!(plain, data);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut out = Vec::new();
        let config = CodecConfig::default().with_chunk_size(0);
        let err = transform(Cursor::new(b"x"), &mut out, UrlDecode::new(), &config).unwrap_err();
        assert!(matches!(err, ToolError::InvalidConfig { .. }));
    }

    #[test]
    fn test_write_error_keeps_earlier_output() {
        let mut sink = FullSink {
            accepted: Vec::new(),
            capacity: 4,
        };
        let config = CodecConfig::new(2).unwrap();
        let codec = UrlEncode::default();
        let err = transform(Cursor::new(b"abcdef"), &mut sink, codec, &config).unwrap_err();

        assert!(matches!(err, ToolError::Io(_)));
        assert_eq!(sink.accepted, b"abcd");
    }
}
