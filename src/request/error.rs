//! Error types for outbound form parameter building.

use thiserror::Error;

/// Errors that can occur while building parameters for a daemon form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A download command was built for no files.
    #[error("no file ids given")]
    NoFileIds,

    /// A file id is not a daemon-side numeric id.
    #[error("invalid file id '{id}': must be numeric")]
    InvalidFileId {
        /// The rejected id.
        id: String,
    },

    /// The command name is not one the download page accepts.
    #[error("unknown download command '{command}' (allowed: pause, resume, delete, cancel, priority)")]
    UnknownCommand {
        /// The rejected command.
        command: String,
    },

    /// The search type is not one the search page accepts.
    #[error("unknown search type '{search_type}' (allowed: global, local, kad)")]
    UnknownSearchType {
        /// The rejected search type.
        search_type: String,
    },

    /// The search text is empty or whitespace.
    #[error("search text is empty")]
    EmptySearch,

    /// The search text exceeds the accepted length.
    #[error("search text too long ({length} chars, max {max})")]
    SearchTooLong {
        /// Length in characters.
        length: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// A required value was blank.
    #[error("{field} must not be empty")]
    Blank {
        /// Which value was blank.
        field: &'static str,
    },
}

impl FormError {
    /// Creates an `InvalidFileId` error.
    #[must_use]
    pub fn invalid_id(id: &str) -> Self {
        Self::InvalidFileId { id: id.to_string() }
    }
}
