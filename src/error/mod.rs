//! Error types for thrunting-tools.

use std::fmt;

use crate::chunk::Fingerprint;

/// Errors that can occur while transforming a stream.
#[derive(Debug)]
pub enum ToolError {
    /// An I/O error occurred on the input or output handle.
    Io(std::io::Error),

    /// Invalid configuration parameter.
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// A radix outside `2..=36` was requested.
    InvalidBase {
        /// The rejected radix.
        base: u32,
    },

    /// A text-mode stream contained bytes that are not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset of the first invalid sequence.
        offset: u64,
    },

    /// A character-code token could not be converted.
    InvalidToken {
        /// The offending token, as read.
        token: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The incremental codec rejected its input.
    Codec {
        /// Codec name.
        codec: &'static str,
        /// Message reported by the codec.
        message: String,
    },

    /// The input is not a valid PE image.
    InvalidImage {
        /// SHA-256 of the rejected input.
        fingerprint: Fingerprint,
        /// Message reported by the parser.
        message: String,
    },

    /// Search settings are contradictory, incomplete or unreadable.
    Settings {
        /// Description of the problem.
        message: String,
    },

    /// The search backend failed or returned an unusable response.
    Backend {
        /// Description of the problem.
        message: String,
    },
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Io(e) => write!(f, "io error: {}", e),
            ToolError::InvalidConfig { message } => write!(f, "invalid config: {}", message),
            ToolError::InvalidBase { base } => {
                write!(f, "invalid base {}: base must be 2<=base<=36", base)
            }
            ToolError::InvalidUtf8 { offset } => {
                write!(f, "invalid utf-8 in input at byte {}", offset)
            }
            ToolError::InvalidToken { token, reason } => {
                write!(f, "invalid token {:?}: {}", token, reason)
            }
            ToolError::Codec { codec, message } => write!(f, "{} failed: {}", codec, message),
            ToolError::InvalidImage {
                fingerprint,
                message,
            } => write!(
                f,
                "unable to process file as PE ({}). sha256: {}",
                message, fingerprint
            ),
            ToolError::Settings { message } => write!(f, "invalid settings: {}", message),
            ToolError::Backend { message } => write!(f, "search backend error: {}", message),
        }
    }
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ToolError {
    fn from(e: std::io::Error) -> Self {
        ToolError::Io(e)
    }
}
