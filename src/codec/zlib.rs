//! zlib (deflate with header and adler32 trailer) via flate2's raw state
//! machines, so each read is compressed or inflated without buffering the
//! whole stream.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};
use log::{debug, warn};

use super::Codec;
use crate::error::ToolError;

/// Spare output capacity reserved before each codec call.
const OUT_RESERVE: usize = 8 * 1024;

/// Streaming zlib compressor.
pub struct Deflate {
    compress: Compress,
}

impl Deflate {
    /// Creates a compressor at the given level (clamped to 0-9).
    pub fn new(level: u32) -> Self {
        Self {
            compress: Compress::new(Compression::new(level.min(9)), true),
        }
    }

    fn codec_error(e: flate2::CompressError) -> ToolError {
        ToolError::Codec {
            codec: "deflate",
            message: e.to_string(),
        }
    }
}

impl Default for Deflate {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_LEVEL)
    }
}

impl Codec for Deflate {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn transform(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        loop {
            out.reserve(OUT_RESERVE);
            let before_in = self.compress.total_in();
            let before_out = self.compress.total_out();

            self.compress
                .compress_vec(input, out, FlushCompress::None)
                .map_err(Self::codec_error)?;

            let consumed = (self.compress.total_in() - before_in) as usize;
            let produced = (self.compress.total_out() - before_out) as usize;
            input = &input[consumed..];

            // Spare room left means the compressor had nothing more to emit.
            if input.is_empty() && out.len() < out.capacity() {
                break;
            }
            if consumed == 0 && produced == 0 {
                break;
            }
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), ToolError> {
        loop {
            out.reserve(OUT_RESERVE);
            let status = self
                .compress
                .compress_vec(&[], out, FlushCompress::Finish)
                .map_err(Self::codec_error)?;

            if status == Status::StreamEnd {
                break;
            }
        }
        debug!(
            "deflate: {} bytes in, {} bytes out",
            self.compress.total_in(),
            self.compress.total_out()
        );
        Ok(())
    }
}

/// Streaming zlib decompressor.
///
/// Input after the zlib end marker is ignored and reported once as a warning.
pub struct Inflate {
    decompress: Decompress,
    done: bool,
    trailing: u64,
}

impl Inflate {
    /// Creates a decompressor expecting a zlib header.
    pub fn new() -> Self {
        Self {
            decompress: Decompress::new(true),
            done: false,
            trailing: 0,
        }
    }

    fn codec_error(e: flate2::DecompressError) -> ToolError {
        ToolError::Codec {
            codec: "inflate",
            message: e.to_string(),
        }
    }

    fn truncated() -> ToolError {
        ToolError::Codec {
            codec: "inflate",
            message: "truncated zlib stream".into(),
        }
    }
}

impl Default for Inflate {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for Inflate {
    fn name(&self) -> &'static str {
        "inflate"
    }

    fn transform(&mut self, mut input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        if self.done {
            self.trailing += input.len() as u64;
            return Ok(());
        }

        loop {
            out.reserve(OUT_RESERVE);
            let before_in = self.decompress.total_in();
            let before_out = self.decompress.total_out();

            let status = self
                .decompress
                .decompress_vec(input, out, FlushDecompress::None)
                .map_err(Self::codec_error)?;

            let consumed = (self.decompress.total_in() - before_in) as usize;
            let produced = (self.decompress.total_out() - before_out) as usize;
            input = &input[consumed..];

            if status == Status::StreamEnd {
                self.done = true;
                self.trailing += input.len() as u64;
                break;
            }
            if input.is_empty() && out.len() < out.capacity() {
                break;
            }
            if consumed == 0 && produced == 0 {
                break;
            }
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), ToolError> {
        // Nothing read at all: empty in, empty out.
        if !self.done && self.decompress.total_in() > 0 {
            loop {
                out.reserve(OUT_RESERVE);
                let before_out = self.decompress.total_out();

                let status = self
                    .decompress
                    .decompress_vec(&[], out, FlushDecompress::Finish)
                    .map_err(Self::codec_error)?;

                if status == Status::StreamEnd {
                    self.done = true;
                    break;
                }
                if self.decompress.total_out() == before_out {
                    return Err(Self::truncated());
                }
            }
        }

        if self.trailing > 0 {
            warn!(
                "inflate: ignored {} bytes after end of zlib stream",
                self.trailing
            );
        }
        debug!(
            "inflate: {} bytes in, {} bytes out",
            self.decompress.total_in(),
            self.decompress.total_out()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn deflate_all(data: &[u8], block: usize) -> Vec<u8> {
        let mut codec = Deflate::default();
        let mut out = Vec::new();
        for piece in data.chunks(block) {
            codec.transform(piece, &mut out).unwrap();
        }
        codec.finish(&mut out).unwrap();
        out
    }

    fn inflate_all(data: &[u8], block: usize) -> Result<Vec<u8>, ToolError> {
        let mut codec = Inflate::new();
        let mut out = Vec::new();
        for piece in data.chunks(block) {
            codec.transform(piece, &mut out)?;
        }
        codec.finish(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_deflate_output_is_standard_zlib() {
        let data = b"hello hello hello hello".repeat(20);
        let compressed = deflate_all(&data, 7);

        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_deflate_empty_input_still_emits_stream() {
        let compressed = deflate_all(b"", 4096);
        assert!(!compressed.is_empty());
        assert_eq!(inflate_all(&compressed, 4096).unwrap(), b"");
    }

    #[test]
    fn test_inflate_byte_at_a_time() {
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 31 % 251) as u8).collect();
        let compressed = deflate_all(&data, 4096);
        assert_eq!(inflate_all(&compressed, 1).unwrap(), data);
    }

    #[test]
    fn test_inflate_large_expansion() {
        // Highly compressible input expands far beyond one output reserve.
        let data = vec![0u8; 1 << 20];
        let compressed = deflate_all(&data, 4096);
        assert!(compressed.len() < OUT_RESERVE);
        assert_eq!(inflate_all(&compressed, 4096).unwrap(), data);
    }

    #[test]
    fn test_inflate_empty_input() {
        assert_eq!(inflate_all(b"", 4096).unwrap(), b"");
    }

    #[test]
    fn test_inflate_truncated_fails() {
        let data = b"some data worth compressing, some data worth compressing".to_vec();
        let compressed = deflate_all(&data, 4096);
        let truncated = &compressed[..compressed.len() - 6];
        assert!(inflate_all(truncated, 4096).is_err());
    }

    #[test]
    fn test_inflate_garbage_fails() {
        assert!(inflate_all(b"definitely not zlib", 4096).is_err());
    }

    #[test]
    fn test_inflate_ignores_trailing_bytes() {
        let mut compressed = deflate_all(b"payload", 4096);
        compressed.extend_from_slice(b"trailing junk");
        assert_eq!(inflate_all(&compressed, 3).unwrap(), b"payload");
    }

    #[test]
    fn test_level_is_clamped() {
        let mut codec = Deflate::new(42);
        let mut out = Vec::new();
        codec.transform(b"abc", &mut out).unwrap();
        codec.finish(&mut out).unwrap();
        assert_eq!(inflate_all(&out, 4096).unwrap(), b"abc");
    }
}
