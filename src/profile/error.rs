//! Error types for loading configuration documents.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a profile or preference-mapping document.
///
/// Callers at the library boundary recover from every variant by falling
/// back to the compiled-in defaults; the error exists so that the reason can
/// be logged and tested.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON for the expected shape.
    #[error("malformed {document} document: {source}")]
    Malformed {
        /// Which document failed (`"profile"` or `"preference mapping"`).
        document: &'static str,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but contains no usable entries.
    #[error("{document} document contains no usable entries")]
    Empty {
        /// Which document was empty.
        document: &'static str,
    },
}

impl ConfigError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
