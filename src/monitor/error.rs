//! Error types at the page transport boundary.

use thiserror::Error;

/// Errors a [`super::PageSource`] reports when a page cannot be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection or I/O failure.
    #[error("failed to fetch '{page}': {message}")]
    Transport {
        /// Page path requested.
        page: String,
        /// Underlying error text.
        message: String,
    },

    /// The daemon answered with a non-success status.
    #[error("fetching '{page}' returned HTTP {status}")]
    Status {
        /// Page path requested.
        page: String,
        /// HTTP status code.
        status: u16,
    },

    /// The session expired and the daemon served its login page.
    #[error("session expired while fetching '{page}'")]
    Unauthorized {
        /// Page path requested.
        page: String,
    },
}

impl FetchError {
    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(page: &str, err: &impl std::fmt::Display) -> Self {
        Self::Transport {
            page: page.to_string(),
            message: err.to_string(),
        }
    }

    /// Page the failed request was for.
    #[must_use]
    pub fn page(&self) -> &str {
        match self {
            Self::Transport { page, .. } | Self::Status { page, .. } | Self::Unauthorized { page } => page,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_and_page() {
        let err = FetchError::transport("stats.php", &"connection refused");
        assert_eq!(err.to_string(), "failed to fetch 'stats.php': connection refused");
        assert_eq!(err.page(), "stats.php");

        let err = FetchError::Status {
            page: "footer.php".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "fetching 'footer.php' returned HTTP 503");
    }
}
