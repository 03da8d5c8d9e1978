//! Percent-encoding and decoding.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, percent_encode};

use super::Codec;
use crate::error::ToolError;

/// Characters left alone by the standard policy but escaped by
/// [`EncodePolicy::All`].
pub const EXTRA_ESCAPES: &[u8] = b"_.-~";

/// Escapes everything except `A-Za-z0-9`, `_ . - ~` and `/`.
const STANDARD: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// The standard set plus the extra escapes and `/`.
const ALL: &AsciiSet = &STANDARD.add(b'_').add(b'.').add(b'-').add(b'~').add(b'/');

/// Which characters [`UrlEncode`] escapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncodePolicy {
    /// Reserved characters only; unreserved characters and `/` pass through.
    #[default]
    Standard,
    /// Every character except ASCII letters and digits.
    All,
}

impl EncodePolicy {
    fn set(self) -> &'static AsciiSet {
        match self {
            EncodePolicy::Standard => STANDARD,
            EncodePolicy::All => ALL,
        }
    }
}

/// Percent-encodes a byte stream with uppercase hex escapes.
///
/// Encoding is byte-wise, so it needs no state across reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlEncode {
    policy: EncodePolicy,
}

impl UrlEncode {
    /// Creates an encoder with the given policy.
    pub fn new(policy: EncodePolicy) -> Self {
        Self { policy }
    }
}

impl Codec for UrlEncode {
    fn name(&self) -> &'static str {
        "url-encode"
    }

    fn transform(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        for piece in percent_encode(input, self.policy.set()) {
            out.extend_from_slice(piece.as_bytes());
        }
        Ok(())
    }

    fn finish(&mut self, _out: &mut Vec<u8>) -> Result<(), ToolError> {
        Ok(())
    }
}

/// Decodes `%XX` escapes. Invalid escapes are copied through unchanged and
/// `+` is not treated as a space.
///
/// An escape cut by a read boundary is held back until the next read.
#[derive(Debug, Default)]
pub struct UrlDecode {
    pending: Vec<u8>,
}

impl UrlDecode {
    /// Creates a decoder.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Number of trailing bytes that may start an escape still missing digits.
fn incomplete_escape(buf: &[u8]) -> usize {
    match buf {
        [.., b'%'] => 1,
        [.., b'%', digit] if digit.is_ascii_hexdigit() => 2,
        _ => 0,
    }
}

impl Codec for UrlDecode {
    fn name(&self) -> &'static str {
        "url-decode"
    }

    fn transform(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        self.pending.extend_from_slice(input);
        let ready = self.pending.len() - incomplete_escape(&self.pending);

        out.extend(percent_decode(&self.pending[..ready]));
        self.pending.drain(..ready);
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), ToolError> {
        out.extend(percent_decode(&self.pending));
        self.pending.clear();
        Ok(())
    }
}
