//! Outbound parameters for the daemon's web forms.
//!
//! The scraping side turns pages into records; this module goes the other
//! way and builds the form parameter sets the transport posts back. Key
//! names are fixed by the daemon's PHP pages and must not be changed.
//!
//! Nothing here performs I/O. The caller sends the [`FormParams`] to the
//! page named by one of the path constants.

mod error;
mod forms;

pub use error::FormError;
pub use forms::{
    DownloadCommand, MAX_SEARCH_LENGTH, SearchType, ServerAction, download_command_params,
    link_submission_params, preference_params, search_download_params, search_params,
    server_action_path,
};

use serde::Serialize;

/// Download list page.
pub const DOWNLOAD_PAGE: &str = "amuleweb-main-dload.php";
/// Footer frame; receives link submissions.
pub const FOOTER_PAGE: &str = "footer.php";
/// Server list page.
pub const SERVER_PAGE: &str = "amuleweb-main-servers.php";
/// Connection status frame.
pub const STATS_PAGE: &str = "stats.php";
/// Search page.
pub const SEARCH_PAGE: &str = "amuleweb-main-search.php";
/// Daemon log.
pub const LOG_PAGE: &str = "log.php";
/// Server log.
pub const SERVER_LOG_PAGE: &str = "log.php?show=srv";
/// Preferences page.
pub const PREFERENCES_PAGE: &str = "amuleweb-main-prefs.php";

/// An ordered set of form parameters.
///
/// Order is kept as inserted; the daemon does not care, but stable order
/// keeps request bodies comparable in logs and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// An empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Value of the first parameter named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether a parameter named `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded `key=value&...` body.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_params_keep_insertion_order() {
        let mut params = FormParams::new();
        params.push("b", "2");
        params.push("a", "1");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(params.get("a"), Some("1"));
        assert!(!params.contains("c"));
    }

    #[test]
    fn test_to_query_string_encodes() {
        let params: FormParams = [("Submit", "Download link"), ("command", ""), ("x", "a&b=c")]
            .into_iter()
            .collect();
        assert_eq!(params.to_query_string(), "Submit=Download%20link&command=&x=a%26b%3Dc");
    }
}
