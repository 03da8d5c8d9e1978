//! Delimiter splitting - RecordIter.
//!
//! [`RecordIter`] reads a UTF-8 stream in bounded blocks and yields the text
//! between delimiters. A delimiter cut by a read boundary is found once the
//! next block arrives, so splitting does not depend on the read size.
//!
//! At end-of-stream whatever remains is yielded exactly once, even when it is
//! empty. `"a b "` split on `" "` therefore yields `"a"`, `"b"` and `""`.

use std::io::Read;

use crate::buffer::Buffer;
use crate::config::CodecConfig;
use crate::error::ToolError;
use crate::util::{Utf8Decoder, read_retrying};

#[derive(Debug)]
enum Split {
    Delimiter(String),
    Width(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Draining,
    Done,
}

/// An iterator over the records of a text stream.
pub struct RecordIter<R> {
    reader: R,
    split: Split,
    decoder: Utf8Decoder,
    pending: String,
    // Start of the unconsumed text in `pending`.
    start: usize,
    // Byte offset in `pending` before which no delimiter can start.
    scanned: usize,
    buffer: Buffer,
    state: State,
}

impl<R: Read> RecordIter<R> {
    /// Splits `reader` on every occurrence of `delimiter`.
    ///
    /// Returns error if the delimiter is empty or the config is invalid.
    pub fn delimited(reader: R, delimiter: &str, config: &CodecConfig) -> Result<Self, ToolError> {
        if delimiter.is_empty() {
            return Err(ToolError::InvalidConfig {
                message: "delimiter must not be empty",
            });
        }
        Self::with_split(reader, Split::Delimiter(delimiter.to_string()), config)
    }

    /// Splits `reader` into records of `width` characters.
    ///
    /// Returns error if the width is zero or the config is invalid.
    pub fn fixed_width(reader: R, width: usize, config: &CodecConfig) -> Result<Self, ToolError> {
        if width == 0 {
            return Err(ToolError::InvalidConfig {
                message: "record width must be non-zero",
            });
        }
        Self::with_split(reader, Split::Width(width), config)
    }

    fn with_split(reader: R, split: Split, config: &CodecConfig) -> Result<Self, ToolError> {
        config.validate()?;
        Ok(Self {
            reader,
            split,
            decoder: Utf8Decoder::new(),
            pending: String::new(),
            start: 0,
            scanned: 0,
            buffer: Buffer::take(config.chunk_size()),
            state: State::Reading,
        })
    }

    /// Cuts the next complete record off the front of the pending text.
    fn take_record(&mut self) -> Option<String> {
        match &self.split {
            Split::Delimiter(delimiter) => {
                let found = self.pending[self.scanned..].find(delimiter.as_str());
                match found {
                    Some(at) => {
                        let end = self.scanned + at;
                        let record = self.pending[self.start..end].to_string();
                        self.start = end + delimiter.len();
                        self.scanned = self.start;
                        Some(record)
                    }
                    None => {
                        // The next delimiter may begin inside the unmatched tail.
                        let tail = self.pending.len().saturating_sub(delimiter.len() - 1);
                        let mut resume = tail.max(self.start);
                        while !self.pending.is_char_boundary(resume) {
                            resume -= 1;
                        }
                        self.scanned = resume;
                        None
                    }
                }
            }
            Split::Width(width) => {
                let (len, _) = self.pending[self.start..].char_indices().nth(*width)?;
                let end = self.start + len;
                let record = self.pending[self.start..end].to_string();
                self.start = end;
                Some(record)
            }
        }
    }

    /// Drops consumed text so `pending` only holds the unmatched tail.
    fn compact(&mut self) {
        if self.start > 0 {
            self.pending.drain(..self.start);
            self.scanned -= self.start.min(self.scanned);
            self.start = 0;
        }
    }

    fn fill(&mut self) -> Result<(), ToolError> {
        let n = read_retrying(&mut self.reader, self.buffer.as_mut_slice())?;
        if n == 0 {
            self.decoder.finish()?;
            self.state = State::Draining;
        } else {
            let text = self.decoder.decode(self.buffer.filled(n))?;
            self.compact();
            self.pending.push_str(&text);
        }
        Ok(())
    }
}

impl<R: Read> Iterator for RecordIter<R> {
    type Item = Result<String, ToolError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::Draining => {
                    if let Some(record) = self.take_record() {
                        return Some(Ok(record));
                    }
                    self.state = State::Done;
                    let rest = self.pending[self.start..].to_string();
                    self.pending = String::new();
                    self.start = 0;
                    return Some(Ok(rest));
                }
                State::Reading => {
                    if let Some(record) = self.take_record() {
                        return Some(Ok(record));
                    }
                    if let Err(e) = self.fill() {
                        self.state = State::Done;
                        return Some(Err(e));
                    }
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for RecordIter<R> {}
