//! thrunting-tools
//!
//! Small stream-transform utilities for threat hunting.
//!
//! Every tool reads its input in bounded blocks, pushes each block through an
//! incremental codec, and writes the output as it is produced. Memory use is
//! bounded by the read size and the codec's own state, never by the input:
//!
//! - zlib deflate / inflate
//! - URL encode / decode
//! - character codes in any radix from 2 to 36, both directions
//! - PE unmapping (the one tool that needs its whole input)
//!
//! It also carries the settings and result-shaping layer of the search query
//! tools, without a network client.
//!
//! It only does one thing per tool: **Read bytes → yield transformed chunks**
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use thrunting_tools::{ChunkIter, CodecConfig, Deflate, ToolError, transform, Inflate};
//!
//! fn main() -> Result<(), ToolError> {
//!     let config = CodecConfig::default();
//!
//!     let mut compressed = Vec::new();
//!     transform(Cursor::new(b"hunting season"), &mut compressed, Deflate::default(), &config)?;
//!
//!     for chunk in ChunkIter::new(Cursor::new(compressed), Inflate::new(), &config)? {
//!         let chunk = chunk?;
//!         println!("chunk {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chunk;
mod error;
mod pe;
mod stream;

mod buffer; // internal (thread-local reuse)
mod hash; // internal sha256 impl
mod util;

pub mod cli;
pub mod codec;
pub mod config;
pub mod io;
pub mod search;

//
// Public surface
//

pub use chunk::{Chunk, Fingerprint};
pub use codec::{
    Codec, Deflate, EncodePolicy, FromCharcode, Inflate, Leniency, Radix, ToCharcode, UrlDecode,
    UrlEncode,
};
pub use config::CodecConfig;
pub use error::ToolError;
pub use hash::Sha256Hasher;
pub use pe::{ImageLayout, SectionSpan, UnmappedImage};
pub use stream::{
    ChunkIter, Pipeline, RecordIter, consume, produce_chunks, produce_delimited, transform,
};
