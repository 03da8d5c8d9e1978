//! Configuration for stream transforms.
//!
//! - [`CodecConfig`] - Read size and compression level
//!
//! # Example
//!
//! ```
//! use thrunting_tools::CodecConfig;
//!
//! let config = CodecConfig::new(8192)?.with_level(9);
//! assert_eq!(config.chunk_size(), 8192);
//! # Ok::<(), thrunting_tools::ToolError>(())
//! ```

use crate::error::ToolError;

/// Default size of one bounded read (4 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Upper bound on the read size (16 MiB).
pub const MAX_CHUNK_SIZE: usize = 16 * 1024 * 1024;

/// Default zlib compression level.
pub const DEFAULT_LEVEL: u32 = 6;

/// Highest zlib compression level.
pub const MAX_LEVEL: u32 = 9;

/// Configuration shared by every stream pipeline.
///
/// `chunk_size` bounds each read from the input, so it also bounds how much
/// input is held in memory per production step. Output is identical for any
/// valid `chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    chunk_size: usize,
    level: u32,
}

impl CodecConfig {
    /// Creates a new configuration with the given read size.
    ///
    /// Returns error if `chunk_size` is zero or above [`MAX_CHUNK_SIZE`].
    pub fn new(chunk_size: usize) -> Result<Self, ToolError> {
        let config = Self {
            chunk_size,
            level: DEFAULT_LEVEL,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the read size.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`CodecConfig::validate`] to check it.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Sets the zlib compression level (0-9).
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Returns the read size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the compression level.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Validates the current configuration.
    pub fn validate(&self) -> Result<(), ToolError> {
        if self.chunk_size == 0 {
            return Err(ToolError::InvalidConfig {
                message: "chunk size must be non-zero",
            });
        }

        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ToolError::InvalidConfig {
                message: "chunk size cannot exceed 16 MiB",
            });
        }

        if self.level > MAX_LEVEL {
            return Err(ToolError::InvalidConfig {
                message: "compression level must be between 0 and 9",
            });
        }

        Ok(())
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            level: DEFAULT_LEVEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.chunk_size(), 4096);
        assert_eq!(config.level(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CodecConfig::default().with_chunk_size(7).with_level(1);
        assert_eq!(config.chunk_size(), 7);
        assert_eq!(config.level(), 1);
    }

    #[test]
    fn test_invalid_zero_size() {
        assert!(CodecConfig::new(0).is_err());
    }

    #[test]
    fn test_invalid_oversized() {
        assert!(CodecConfig::new(MAX_CHUNK_SIZE + 1).is_err());
        assert!(CodecConfig::new(MAX_CHUNK_SIZE).is_ok());
    }

    #[test]
    fn test_invalid_level() {
        let config = CodecConfig::default().with_level(10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_odd_sizes_allowed() {
        assert!(CodecConfig::new(1).is_ok());
        assert!(CodecConfig::new(4097).is_ok());
    }
}
