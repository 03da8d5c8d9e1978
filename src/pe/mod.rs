//! Unmapping PE images captured from memory.
//!
//! A loaded image stores each section at its virtual address. Unmapping
//! writes the headers followed by every section's raw bytes sliced from that
//! virtual address, in section-table order, which restores the on-disk
//! layout closely enough for static tooling.

use std::io::{Read, Write};

use goblin::error::Error as GoblinError;
use goblin::pe::header::{Header, PE_MAGIC, SIZEOF_COFF_HEADER, SIZEOF_PE_MAGIC};
use log::debug;

use crate::chunk::Fingerprint;
use crate::config::CodecConfig;
use crate::error::ToolError;
use crate::hash::Sha256Hasher;
use crate::util::read_retrying;

/// Where one section lives in the mapped image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    /// Virtual address, used as an offset into the mapped image.
    pub virtual_address: usize,
    /// Raw size of the section.
    pub raw_size: usize,
}

/// The parts of a mapped image copied by [`ImageLayout::unmap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLayout {
    /// `SizeOfHeaders` from the optional header.
    pub header_len: usize,
    /// Sections in table order.
    pub sections: Vec<SectionSpan>,
}

/// Slices like a lenient range index: out-of-range bounds are clamped.
fn clamped(image: &[u8], start: usize, len: usize) -> &[u8] {
    let start = start.min(image.len());
    let end = start.saturating_add(len).min(image.len());
    &image[start..end]
}

impl ImageLayout {
    /// Reads the header size and section table of a mapped image.
    ///
    /// Data directories are never followed, so a dump with damaged imports or
    /// exports still unmaps.
    pub fn parse(image: &[u8]) -> Result<Self, GoblinError> {
        let header = Header::parse(image)?;
        if header.signature != PE_MAGIC {
            return Err(GoblinError::Malformed(format!(
                "bad PE signature {:#010x}",
                header.signature
            )));
        }
        let optional = header
            .optional_header
            .ok_or_else(|| GoblinError::Malformed("image has no optional header".into()))?;

        // The section table follows the optional header.
        let mut offset = header.dos_header.pe_pointer as usize
            + SIZEOF_PE_MAGIC
            + SIZEOF_COFF_HEADER
            + header.coff_header.size_of_optional_header as usize;
        let sections = header.coff_header.sections(image, &mut offset)?;

        Ok(Self {
            header_len: optional.windows_fields.size_of_headers as usize,
            sections: sections
                .iter()
                .map(|section| SectionSpan {
                    virtual_address: section.virtual_address as usize,
                    raw_size: section.size_of_raw_data as usize,
                })
                .collect(),
        })
    }

    /// Writes the unmapped form of `image` and returns the bytes written.
    pub fn unmap<W: Write + ?Sized>(&self, image: &[u8], writer: &mut W) -> std::io::Result<u64> {
        let mut written = 0u64;

        let header = clamped(image, 0, self.header_len);
        writer.write_all(header)?;
        written += header.len() as u64;

        for span in &self.sections {
            let body = clamped(image, span.virtual_address, span.raw_size);
            writer.write_all(body)?;
            written += body.len() as u64;
        }
        Ok(written)
    }
}

/// A fully read mapped image with its parsed layout.
#[derive(Debug)]
pub struct UnmappedImage {
    image: Vec<u8>,
    fingerprint: Fingerprint,
    layout: ImageLayout,
}

impl UnmappedImage {
    /// Reads all of `reader`, fingerprinting it as it goes, then parses it.
    ///
    /// Nothing is written anywhere; a parse failure is reported as
    /// [`ToolError::InvalidImage`] carrying the input's SHA-256.
    pub fn load<R: Read>(mut reader: R, config: &CodecConfig) -> Result<Self, ToolError> {
        config.validate()?;

        let mut hasher = Sha256Hasher::new();
        let mut image = Vec::new();
        let mut block = vec![0u8; config.chunk_size()];
        loop {
            let n = read_retrying(&mut reader, &mut block)?;
            if n == 0 {
                break;
            }
            hasher.update(&block[..n]);
            image.extend_from_slice(&block[..n]);
        }
        let fingerprint = hasher.finalize();

        let layout = ImageLayout::parse(&image).map_err(|e| ToolError::InvalidImage {
            fingerprint,
            message: e.to_string(),
        })?;
        debug!(
            "unmap-pe: {} bytes, {} sections, sha256 {}",
            image.len(),
            layout.sections.len(),
            fingerprint
        );

        Ok(Self {
            image,
            fingerprint,
            layout,
        })
    }

    /// Returns the SHA-256 of the input.
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Returns the parsed layout.
    pub fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Writes the unmapped image and flushes `writer`.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<u64, ToolError> {
        let written = self.layout.unmap(&self.image, writer)?;
        writer.flush()?;
        Ok(written)
    }
}
