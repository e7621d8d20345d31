//! Versioned table/selector configuration and daemon version detection.
//!
//! Every daemon release lays its pages out slightly differently. A
//! [`VersionProfile`] records, per document type, which table holds the data,
//! how many header rows precede it, and which CSS selectors locate tables,
//! rows, scripts and log blocks.
//!
//! Profiles are resolved through a fixed chain: exact label, then the alias
//! table, then the `"default"` profile. Resolution never fails.
//!
//! # Example
//!
//! ```
//! use amuleweb_core::profile::{ProfileRegistry, detect_version};
//!
//! let registry = ProfileRegistry::builtin();
//! let label = detect_version("<div>aMule 2.3.1</div>");
//! assert_eq!(label, "2.3.2");
//! assert_eq!(registry.resolve(&label).label, "2.3.2");
//! assert_eq!(registry.resolve("9.9.9").label, "default");
//! ```

mod error;
mod version;

pub use error::ConfigError;
pub use version::{
    Compatibility, SUPPORTED_VERSIONS, UNKNOWN_VERSION, canonical_version, compatibility,
    detect_version, is_supported, supported_versions,
};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Label of the fallback profile.
pub const DEFAULT_PROFILE: &str = "default";

const DEFAULT_TABLE_SELECTOR: &str = "table";
const DEFAULT_ROW_SELECTOR: &str = "tr";
const DEFAULT_LOG_SELECTOR: &str = "pre";
const DEFAULT_SCRIPT_SELECTOR: &str = "script";

/// Where one document's data table lives inside the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableTarget {
    /// CSS selector matching candidate tables, in document order.
    pub selector: String,
    /// Zero-based index of the data table among the selector's matches.
    pub table_index: usize,
    /// Number of leading header rows to skip.
    pub row_skip: usize,
}

impl TableTarget {
    /// Creates a target using the default `table` selector.
    #[must_use]
    pub fn new(table_index: usize, row_skip: usize) -> Self {
        Self {
            selector: DEFAULT_TABLE_SELECTOR.to_string(),
            table_index,
            row_skip,
        }
    }
}

/// Table indices, header-skip counts and selectors valid for one daemon release.
///
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionProfile {
    /// Version label (e.g. `"2.3.2"`) or `"default"`.
    pub label: String,
    /// Free-form note from the profile document.
    pub description: Option<String>,
    /// Download list table.
    pub download: TableTarget,
    /// Upload list table (embedded in the download page).
    pub upload: TableTarget,
    /// First server table; every matching table from here on is scanned.
    pub server: TableTarget,
    /// Selector for the tables scanned on the statistics page.
    pub stats_selector: String,
    /// Selector for search result rows.
    pub search_row_selector: String,
    /// Selector for the log page's text block.
    pub log_selector: String,
    /// Selector for inline scripts on the preferences page.
    pub script_selector: String,
    /// Whether blank cells in the two unused upload columns advance the
    /// cursor instead of ending the row.
    pub upload_blank_gap_advances: bool,
}

impl VersionProfile {
    /// The compiled-in profile used when nothing better is known.
    #[must_use]
    pub fn builtin_default() -> Self {
        Self::builtin(DEFAULT_PROFILE, "Layout shared by aMule 2.3.x web templates")
    }

    fn builtin(label: &str, description: &str) -> Self {
        Self {
            label: label.to_string(),
            description: Some(description.to_string()),
            download: TableTarget::new(6, 1),
            upload: TableTarget::new(8, 2),
            server: TableTarget::new(1, 3),
            stats_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            search_row_selector: DEFAULT_ROW_SELECTOR.to_string(),
            log_selector: DEFAULT_LOG_SELECTOR.to_string(),
            script_selector: DEFAULT_SCRIPT_SELECTOR.to_string(),
            upload_blank_gap_advances: true,
        }
    }

    fn from_document(label: &str, data: ProfileDocumentEntry) -> Self {
        let base = Self::builtin_default();
        Self {
            label: label.to_string(),
            description: data.description,
            download: TableTarget {
                selector: checked_selector(label, data.download_table_selector, &base.download.selector),
                table_index: data.download_table_index.unwrap_or(base.download.table_index),
                row_skip: data.download_row_skip_count.unwrap_or(base.download.row_skip),
            },
            upload: TableTarget {
                selector: checked_selector(label, data.upload_table_selector, &base.upload.selector),
                table_index: data.upload_table_index.unwrap_or(base.upload.table_index),
                row_skip: data.upload_row_skip_count.unwrap_or(base.upload.row_skip),
            },
            server: TableTarget {
                selector: checked_selector(label, data.server_table_selector, &base.server.selector),
                table_index: data.server_table_index.unwrap_or(base.server.table_index),
                row_skip: data.server_row_skip_count.unwrap_or(base.server.row_skip),
            },
            stats_selector: checked_selector(label, data.stats_table_selector, &base.stats_selector),
            search_row_selector: checked_selector(label, data.search_row_selector, &base.search_row_selector),
            log_selector: checked_selector(label, data.log_content_selector, &base.log_selector),
            script_selector: checked_selector(
                label,
                data.preferences_script_selector,
                &base.script_selector,
            ),
            upload_blank_gap_advances: data
                .upload_blank_gap_advances
                .unwrap_or(base.upload_blank_gap_advances),
        }
    }
}

impl Default for VersionProfile {
    fn default() -> Self {
        Self::builtin_default()
    }
}

/// Keeps `candidate` only if it compiles as a CSS selector.
fn checked_selector(label: &str, candidate: Option<String>, fallback: &str) -> String {
    match candidate {
        Some(selector) if Selector::parse(&selector).is_ok() => selector,
        Some(selector) => {
            warn!(profile = %label, selector = %selector, fallback, "invalid selector in profile, using fallback");
            fallback.to_string()
        }
        None => fallback.to_string(),
    }
}

/// Root of the profile JSON document.
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    versions: HashMap<String, ProfileDocumentEntry>,
}

/// One version entry of the profile JSON document. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ProfileDocumentEntry {
    description: Option<String>,
    download_table_index: Option<usize>,
    download_row_skip_count: Option<usize>,
    upload_table_index: Option<usize>,
    upload_row_skip_count: Option<usize>,
    server_table_index: Option<usize>,
    server_row_skip_count: Option<usize>,
    download_table_selector: Option<String>,
    upload_table_selector: Option<String>,
    server_table_selector: Option<String>,
    stats_table_selector: Option<String>,
    search_row_selector: Option<String>,
    log_content_selector: Option<String>,
    preferences_script_selector: Option<String>,
    upload_blank_gap_advances: Option<bool>,
}

/// Set of known version profiles, always containing `"default"`.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<VersionProfile>>,
}

impl ProfileRegistry {
    /// Registry with the compiled-in profiles for every supported version.
    #[must_use]
    pub fn builtin() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(
            DEFAULT_PROFILE.to_string(),
            Arc::new(VersionProfile::builtin_default()),
        );
        for label in SUPPORTED_VERSIONS {
            profiles.insert(
                label.to_string(),
                Arc::new(VersionProfile::builtin(label, "Verified against this release")),
            );
        }
        Self { profiles }
    }

    /// Parses a profile document.
    ///
    /// Labels missing from the document keep their compiled-in profile, and a
    /// document without a `"default"` entry keeps the compiled-in default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if the JSON does not parse and
    /// [`ConfigError::Empty`] if it declares no versions.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let document: ProfileDocument =
            serde_json::from_str(raw).map_err(|source| ConfigError::Malformed {
                document: "profile",
                source,
            })?;

        if document.versions.is_empty() {
            return Err(ConfigError::Empty {
                document: "profile",
            });
        }

        let mut registry = Self::builtin();
        for (label, entry) in document.versions {
            let label = label.trim().to_string();
            debug!(profile = %label, "loaded profile from document");
            let profile = VersionProfile::from_document(&label, entry);
            registry.profiles.insert(label, Arc::new(profile));
        }
        Ok(registry)
    }

    /// Reads and parses a profile document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`ProfileRegistry::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    /// Loads `path` if given, falling back to [`ProfileRegistry::builtin`] on
    /// any failure. Never fails.
    #[must_use]
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            debug!("no profile document configured, using built-in profiles");
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(registry) => {
                info!(path = %path.display(), profiles = registry.len(), "loaded version profiles");
                registry
            }
            Err(e) => {
                warn!(error = %e, "profile document unusable, using built-in profiles");
                Self::builtin()
            }
        }
    }

    /// Number of profiles (including `"default"`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Always false; the default profile is always present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Returns the profile for `label`: exact match, then alias, then `"default"`.
    #[must_use]
    pub fn resolve(&self, label: &str) -> Arc<VersionProfile> {
        let label = label.trim();
        if let Some(profile) = self.profiles.get(label) {
            debug!(version = %label, "resolved exact profile");
            return Arc::clone(profile);
        }

        let canonical = canonical_version(label);
        if canonical != label
            && let Some(profile) = self.profiles.get(canonical)
        {
            debug!(version = %label, canonical, "resolved profile through alias");
            return Arc::clone(profile);
        }

        if label != UNKNOWN_VERSION {
            info!(version = %label, "no profile for version, using default");
        }
        self.profiles
            .get(DEFAULT_PROFILE)
            .map_or_else(|| Arc::new(VersionProfile::builtin_default()), Arc::clone)
    }

    /// Labels with a profile, sorted.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
