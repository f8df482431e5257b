use std::io;
use thiserror::Error;

/// Error types for MD3 decoding and player model assembly
#[derive(Error, Debug)]
pub enum Md3Error {
    /// I/O error, usually a read running past the end of the buffer
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Buffer is shorter than the fixed header
    #[error("{name}: {len} bytes is too short for an MD3 header")]
    HeaderTooShort { name: String, len: usize },

    /// Invalid magic number in the file header
    #[error("Invalid magic number: expected '{expected}', got '{actual}'")]
    InvalidMagic { expected: String, actual: String },

    /// Unsupported file version
    #[error("Unsupported version: {0}")]
    UnsupportedVersion(i32),

    /// A section runs past the end of the buffer
    #[error("Truncated {section} section at offset {offset}")]
    Truncated { section: &'static str, offset: usize },

    /// A required resource could not be found by the provider
    #[error("Missing resource: {0}")]
    MissingResource(String),

    /// Error during parsing
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl Md3Error {
    /// Whether this error means the bytes are not a decodable MD3 model
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::HeaderTooShort { .. }
                | Self::InvalidMagic { .. }
                | Self::UnsupportedVersion(_)
                | Self::Truncated { .. }
                | Self::ParseError(_)
        )
    }
}

/// Result type using Md3Error
pub type Result<T> = std::result::Result<T, Md3Error>;
