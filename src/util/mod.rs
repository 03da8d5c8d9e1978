//! Internal utility functions and helpers.
//!
//! Not part of the public API.

use crate::error::ToolError;

/// Incremental UTF-8 decoder for text-mode streams.
///
/// A multi-byte character may be split across two reads; the incomplete tail
/// is carried into the next call instead of being rejected.
#[derive(Debug, Default)]
pub(crate) struct Utf8Decoder {
    carry: Vec<u8>,
    offset: u64,
}

impl Utf8Decoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `carry + input` as forms complete characters.
    pub(crate) fn decode(&mut self, input: &[u8]) -> Result<String, ToolError> {
        self.carry.extend_from_slice(input);

        let valid = match std::str::from_utf8(&self.carry) {
            Ok(_) => self.carry.len(),
            Err(e) => {
                if e.error_len().is_some() {
                    return Err(ToolError::InvalidUtf8 {
                        offset: self.offset + e.valid_up_to() as u64,
                    });
                }
                e.valid_up_to()
            }
        };

        let text = std::str::from_utf8(&self.carry[..valid])
            .map_err(|e| ToolError::InvalidUtf8 {
                offset: self.offset + e.valid_up_to() as u64,
            })?
            .to_owned();
        self.carry.drain(..valid);
        self.offset += valid as u64;
        Ok(text)
    }

    /// Fails if the stream ended inside a character.
    pub(crate) fn finish(&self) -> Result<(), ToolError> {
        if self.carry.is_empty() {
            Ok(())
        } else {
            Err(ToolError::InvalidUtf8 {
                offset: self.offset,
            })
        }
    }
}

/// Reads once, retrying when the read is interrupted.
pub(crate) fn read_retrying<R: std::io::Read>(
    reader: &mut R,
    buf: &mut [u8],
) -> std::io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_multibyte_char() {
        let bytes = "h\u{e9}llo".as_bytes();
        let mut decoder = Utf8Decoder::new();

        let first = decoder.decode(&bytes[..2]).unwrap();
        assert_eq!(first, "h");

        let second = decoder.decode(&bytes[2..]).unwrap();
        assert_eq!(second, "\u{e9}llo");
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_four_byte_char_fed_one_byte_at_a_time() {
        let mut decoder = Utf8Decoder::new();
        let mut text = String::new();
        for byte in "a\u{1F600}b".as_bytes() {
            text.push_str(&decoder.decode(std::slice::from_ref(byte)).unwrap());
        }
        assert_eq!(text, "a\u{1F600}b");
        assert!(!text.contains('\u{FFFD}'));
        assert!(decoder.finish().is_ok());
    }

    #[test]
    fn test_invalid_sequence_reports_offset() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(b"abc").unwrap();
        let err = decoder.decode(b"d\xffe").unwrap_err();
        assert!(matches!(err, ToolError::InvalidUtf8 { offset: 4 }));
    }

    #[test]
    fn test_truncated_at_end() {
        let mut decoder = Utf8Decoder::new();
        decoder.decode(&"\u{e9}".as_bytes()[..1]).unwrap();
        assert!(decoder.finish().is_err());
    }

    #[test]
    fn test_read_retrying_passes_through() {
        let mut cursor = std::io::Cursor::new(b"xyz".to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(read_retrying(&mut cursor, &mut buf).unwrap(), 3);
        assert_eq!(read_retrying(&mut cursor, &mut buf).unwrap(), 0);
    }
}
