//! Error types for resource link parsing.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a link failure, for callers that present their
/// own localized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkErrorKind {
    NullOrEmpty,
    EncodingError,
    InvalidFormat,
    MissingRequired,
    InvalidSize,
    InvalidHash,
}

/// Errors that can occur while parsing an `ed2k://` link.
///
/// The `Display` text is suitable for showing to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkParseError {
    /// Input was empty or whitespace.
    #[error("URL is null or empty.")]
    Empty,

    /// Percent-decoding produced invalid UTF-8.
    #[error("Failed to decode URL. The link may be corrupted or contain invalid characters.")]
    Encoding {
        /// Decoder message.
        reason: String,
    },

    /// The link does not have the `ed2k://|file|name|size|hash|/` shape.
    #[error("Invalid ed2k link format. Expected format: ed2k://|file|filename|size|hash|/")]
    InvalidFormat,

    /// The name decoded to nothing.
    #[error("Missing required field. Ed2k links must have filename, size, and hash.")]
    MissingName,

    /// The size field is not an integer.
    #[error("Invalid file size. Size must be a positive number.")]
    InvalidSize {
        /// The offending size text.
        raw: String,
    },

    /// The size is below one byte.
    #[error("File size must be at least 1 byte")]
    SizeTooSmall {
        /// The offending size text.
        raw: String,
    },

    /// The size is above 16 TiB.
    #[error("File size exceeds maximum of 16 TB")]
    SizeTooLarge {
        /// The offending size text.
        raw: String,
    },

    /// The hash is not 32 hexadecimal characters.
    #[error("Invalid file hash. Hash must be exactly 32 hexadecimal characters (MD4).")]
    InvalidHash {
        /// The offending hash, upper-cased.
        hash: String,
    },
}

impl LinkParseError {
    /// The classification of this error.
    #[must_use]
    pub fn kind(&self) -> LinkErrorKind {
        match self {
            Self::Empty => LinkErrorKind::NullOrEmpty,
            Self::Encoding { .. } => LinkErrorKind::EncodingError,
            Self::InvalidFormat => LinkErrorKind::InvalidFormat,
            Self::MissingName => LinkErrorKind::MissingRequired,
            Self::InvalidSize { .. } | Self::SizeTooSmall { .. } | Self::SizeTooLarge { .. } => {
                LinkErrorKind::InvalidSize
            }
            Self::InvalidHash { .. } => LinkErrorKind::InvalidHash,
        }
    }

    /// Creates an `Encoding` error from a decoder failure.
    #[must_use]
    pub fn encoding(err: &impl std::fmt::Display) -> Self {
        Self::Encoding {
            reason: err.to_string(),
        }
    }
}
