//! Character codes in an arbitrary radix.
//!
//! [`ToCharcode`] turns each character of a UTF-8 stream into its code point
//! written in base 2..=36, joined by a delimiter. [`FromCharcode`] reverses it
//! on top of [`RecordIter`]: every record is one code.
//!
//! With an empty delimiter, codes are written zero-padded to a fixed width
//! (the number of digits of 255 in the radix) and read back in slices of that
//! width, so only characters up to U+00FF can round-trip that way.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use log::{debug, warn};

use super::Codec;
use crate::config::CodecConfig;
use crate::error::ToolError;
use crate::stream::RecordIter;
use crate::util::Utf8Decoder;

/// Largest code point representable without a delimiter.
const FIXED_WIDTH_MAX: u32 = 0xFF;

/// A validated radix in `2..=36`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Radix(u32);

impl Radix {
    /// Smallest supported radix.
    pub const MIN: u32 = 2;
    /// Largest supported radix.
    pub const MAX: u32 = 36;

    /// Creates a radix, rejecting values outside `2..=36`.
    pub fn new(base: u32) -> Result<Self, ToolError> {
        if (Self::MIN..=Self::MAX).contains(&base) {
            Ok(Self(base))
        } else {
            Err(ToolError::InvalidBase { base })
        }
    }

    /// Returns the radix value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Writes `value` in this radix with lowercase digits.
    pub fn encode(self, mut value: u32) -> String {
        if value == 0 {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        while value > 0 {
            // from_digit cannot fail: the digit is below a radix <= 36
            digits.extend(char::from_digit(value % self.0, self.0));
            value /= self.0;
        }
        digits.iter().rev().collect()
    }

    /// Writes `value` zero-padded to [`Radix::width`].
    pub fn encode_padded(self, value: u32) -> String {
        format!("{:0>width$}", self.encode(value), width = self.width())
    }

    /// Parses an ASCII-alphanumeric token in this radix, either case.
    pub fn parse(self, token: &str) -> Option<u32> {
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        u32::from_str_radix(token, self.0).ok()
    }

    /// Digits needed to write 255 in this radix.
    pub fn width(self) -> usize {
        self.encode(FIXED_WIDTH_MAX).len()
    }
}

impl Default for Radix {
    fn default() -> Self {
        Self(16)
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Radix {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ToolError::InvalidConfig {
                message: "base must be an integer",
            })?;
        Self::new(base)
    }
}

/// Encodes each character of a UTF-8 stream as a radix code.
pub struct ToCharcode {
    radix: Radix,
    delimiter: String,
    first: bool,
    decoder: Utf8Decoder,
}

impl ToCharcode {
    /// Creates an encoder. An empty delimiter selects fixed-width codes.
    pub fn new(radix: Radix, delimiter: impl Into<String>) -> Self {
        Self {
            radix,
            delimiter: delimiter.into(),
            first: true,
            decoder: Utf8Decoder::new(),
        }
    }

    fn push_char(&mut self, ch: char, out: &mut Vec<u8>) -> Result<(), ToolError> {
        let code = ch as u32;
        let digits = if self.delimiter.is_empty() {
            if code > FIXED_WIDTH_MAX {
                return Err(ToolError::InvalidToken {
                    token: ch.to_string(),
                    reason: "characters above U+00FF need a delimiter",
                });
            }
            self.radix.encode_padded(code)
        } else {
            if !self.first {
                out.extend_from_slice(self.delimiter.as_bytes());
            }
            self.radix.encode(code)
        };
        self.first = false;
        out.extend_from_slice(digits.as_bytes());
        Ok(())
    }
}

impl Codec for ToCharcode {
    fn name(&self) -> &'static str {
        "to-charcode"
    }

    fn transform(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        let text = self.decoder.decode(input)?;
        for ch in text.chars() {
            self.push_char(ch, out)?;
        }
        Ok(())
    }

    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), ToolError> {
        self.decoder.finish()
    }
}

/// What to do with a token that is not a valid code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Leniency {
    /// Log a warning and skip the token.
    #[default]
    Skip,
    /// Fail the whole transform.
    Strict,
}

/// Decodes radix codes back into characters.
#[derive(Debug, Clone)]
pub struct FromCharcode {
    radix: Radix,
    delimiter: String,
    leniency: Leniency,
}

impl FromCharcode {
    /// Creates a decoder. An empty delimiter selects fixed-width codes.
    pub fn new(radix: Radix, delimiter: impl Into<String>) -> Self {
        Self {
            radix,
            delimiter: delimiter.into(),
            leniency: Leniency::default(),
        }
    }

    /// Sets how invalid tokens are handled.
    pub fn with_leniency(mut self, leniency: Leniency) -> Self {
        self.leniency = leniency;
        self
    }

    /// Converts one token. Blank tokens yield `Ok(None)`.
    pub fn decode_token(&self, token: &str) -> Result<Option<char>, ToolError> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let decoded = match self.radix.parse(trimmed) {
            None => Err("not a number in the requested base"),
            Some(code) => char::from_u32(code).ok_or("not a unicode scalar value"),
        };

        match (decoded, self.leniency) {
            (Ok(ch), _) => Ok(Some(ch)),
            (Err(reason), Leniency::Skip) => {
                warn!("skipping token {:?}: {}", trimmed, reason);
                Ok(None)
            }
            (Err(reason), Leniency::Strict) => Err(ToolError::InvalidToken {
                token: trimmed.to_string(),
                reason,
            }),
        }
    }

    /// Streams decoded characters from `reader` to `writer`.
    ///
    /// Returns the number of characters written.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: R,
        writer: &mut W,
        config: &CodecConfig,
    ) -> Result<u64, ToolError> {
        let records = if self.delimiter.is_empty() {
            RecordIter::fixed_width(reader, self.radix.width(), config)?
        } else {
            RecordIter::delimited(reader, &self.delimiter, config)?
        };

        let mut written = 0u64;
        let mut utf8 = [0u8; 4];
        for record in records {
            if let Some(ch) = self.decode_token(&record?)? {
                writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
                written += 1;
            }
        }
        writer.flush()?;
        debug!("from-charcode: wrote {} characters", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode(input: &str, radix: u32, delimiter: &str) -> Result<String, ToolError> {
        let mut codec = ToCharcode::new(Radix::new(radix).unwrap(), delimiter);
        let mut out = Vec::new();
        codec.transform(input.as_bytes(), &mut out)?;
        codec.finish(&mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn decode(input: &str, radix: u32, delimiter: &str) -> Result<String, ToolError> {
        let decoder = FromCharcode::new(Radix::new(radix).unwrap(), delimiter);
        let mut out = Vec::new();
        let config = CodecConfig::default();
        decoder.run(Cursor::new(input.as_bytes()), &mut out, &config)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_radix_bounds() {
        assert!(Radix::new(1).is_err());
        assert!(Radix::new(2).is_ok());
        assert!(Radix::new(36).is_ok());
        let err = Radix::new(37).unwrap_err();
        assert!(matches!(err, ToolError::InvalidBase { base: 37 }));
    }

    #[test]
    fn test_radix_from_str() {
        assert_eq!("8".parse::<Radix>().unwrap().get(), 8);
        assert!("0".parse::<Radix>().is_err());
        assert!("sixteen".parse::<Radix>().is_err());
    }

    #[test]
    fn test_radix_encode() {
        let hex = Radix::new(16).unwrap();
        assert_eq!(hex.encode(0), "0");
        assert_eq!(hex.encode(0x6c), "6c");
        assert_eq!(Radix::new(2).unwrap().encode(5), "101");
        assert_eq!(Radix::new(36).unwrap().encode(35), "z");
    }

    #[test]
    fn test_radix_width() {
        assert_eq!(Radix::new(16).unwrap().width(), 2);
        assert_eq!(Radix::new(10).unwrap().width(), 3);
        assert_eq!(Radix::new(2).unwrap().width(), 8);
        assert_eq!(Radix::new(36).unwrap().width(), 2);
        assert_eq!(Radix::new(2).unwrap().encode_padded(10), "00001010");
    }

    #[test]
    fn test_radix_parse_rejects_signs_and_punctuation() {
        let hex = Radix::new(16).unwrap();
        assert_eq!(hex.parse("6C"), Some(0x6c));
        assert_eq!(hex.parse("+6c"), None);
        assert_eq!(hex.parse("6c!"), None);
        assert_eq!(hex.parse("zz"), None);
        assert_eq!(hex.parse(""), None);
    }

    #[test]
    fn test_encode_hello() {
        assert_eq!(encode("hello", 16, " ").unwrap(), "68 65 6c 6c 6f");
    }

    #[test]
    fn test_encode_fixed_width() {
        assert_eq!(encode("hello", 16, "").unwrap(), "68656c6c6f");
        assert_eq!(encode("\n", 10, "").unwrap(), "010");
    }

    #[test]
    fn test_encode_fixed_width_rejects_wide_chars() {
        assert!(encode("\u{263a}", 16, "").is_err());
    }

    #[test]
    fn test_encode_multichar_delimiter_and_unicode() {
        assert_eq!(encode("a\u{263a}", 16, ", ").unwrap(), "61, 263a");
    }

    #[test]
    fn test_decode_fixed_width() {
        assert_eq!(decode("68656c6c6f", 16, "").unwrap(), "hello");
    }

    #[test]
    fn test_decode_delimited() {
        assert_eq!(decode("68 65 6c 6c 6f", 16, " ").unwrap(), "hello");
    }

    #[test]
    fn test_decode_trailing_newline() {
        assert_eq!(decode("68 69\n", 16, " ").unwrap(), "hi");
    }

    #[test]
    fn test_decode_skips_garbage() {
        assert_eq!(decode("68 zz ?? 69", 16, " ").unwrap(), "hi");
    }

    #[test]
    fn test_decode_strict_rejects_garbage() {
        let decoder = FromCharcode::new(Radix::default(), " ").with_leniency(Leniency::Strict);
        let config = CodecConfig::default();
        let mut out = Vec::new();
        let err = decoder
            .run(Cursor::new(&b"68 zz 69"[..]), &mut out, &config)
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidToken { .. }));
    }

    #[test]
    fn test_decode_surrogate_is_invalid() {
        let decoder = FromCharcode::new(Radix::default(), " ").with_leniency(Leniency::Strict);
        assert!(decoder.decode_token("d800").is_err());
        assert_eq!(decoder.decode_token("  ").unwrap(), None);
    }

    #[test]
    fn test_roundtrip_all_radices() {
        let text = "Hunt \u{e9}vil \u{1F50E}!";
        for radix in Radix::MIN..=Radix::MAX {
            let encoded = encode(text, radix, " ").unwrap();
            let decoded = decode(&encoded, radix, " ").unwrap();
            assert_eq!(decoded, text, "radix {}", radix);
        }
    }
}
