//! Incremental transforms driven one bounded read at a time.
//!
//! - [`Codec`] - The stateful transform contract
//! - [`Deflate`] / [`Inflate`] - zlib compression and decompression
//! - [`UrlEncode`] / [`UrlDecode`] - percent-encoding
//! - [`ToCharcode`] - characters to radix codes
//!
//! Decoding character codes splits text into records rather than transforming
//! bytes, so it lives in [`charcode::FromCharcode`] on top of
//! [`crate::RecordIter`].

pub mod charcode;
mod url;
mod zlib;

pub use charcode::{FromCharcode, Leniency, Radix, ToCharcode};
pub use url::{EXTRA_ESCAPES, EncodePolicy, UrlDecode, UrlEncode};
pub use zlib::{Deflate, Inflate};

use crate::error::ToolError;

/// A stateful, incremental byte transform.
///
/// `transform` is called once per non-empty read, in stream order, and may
/// append nothing when the codec buffers internally. `finish` is called once
/// when the input is exhausted and appends whatever is still buffered.
/// A codec is never used again after `finish`.
pub trait Codec {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Transforms one block of input, appending output to `out`.
    fn transform(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError>;

    /// Flushes buffered state at end-of-stream, appending output to `out`.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), ToolError>;
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn transform(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), ToolError> {
        (**self).transform(input, out)
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), ToolError> {
        (**self).finish(out)
    }
}
