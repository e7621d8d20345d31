//! Daemon version detection from the footer page.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Sentinel returned when no version can be detected.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Releases whose page layout has been verified.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["2.3.2", "2.3.3"];

/// Legacy labels that render pages identically to a supported release.
const VERSION_ALIASES: [(&str, &str); 3] = [("2.3", "2.3.2"), ("2.3.0", "2.3.2"), ("2.3.1", "2.3.2")];

/// Product name followed by a dotted version, e.g. `aMule 2.3.2`.
#[allow(clippy::expect_used)]
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)aMule\s+([\d.]+)").expect("version regex is valid") // Static pattern, safe to panic
});

/// Extracts the daemon version label from footer markup.
///
/// Known aliases are mapped onto their canonical label, so `"aMule 2.3.1"`
/// yields `"2.3.2"`. Returns [`UNKNOWN_VERSION`] for blank input or when the
/// pattern does not match.
#[tracing::instrument(skip(html), fields(html_len = html.len()))]
#[must_use]
pub fn detect_version(html: &str) -> String {
    if html.trim().is_empty() {
        warn!("version footer is empty");
        return UNKNOWN_VERSION.to_string();
    }

    let Some(captured) = VERSION_PATTERN.captures(html).and_then(|cap| cap.get(1)) else {
        warn!("no version pattern in footer");
        debug!(preview = %html.chars().take(200).collect::<String>(), "footer preview");
        return UNKNOWN_VERSION.to_string();
    };

    // A sentence-ending period after the number is not part of the version.
    let detected = captured.as_str().trim_end_matches('.');
    if detected.is_empty() {
        return UNKNOWN_VERSION.to_string();
    }

    let canonical = canonical_version(detected);
    if canonical == detected {
        info!(version = %detected, "detected daemon version");
    } else {
        info!(version = %detected, canonical, "detected daemon version through alias");
    }
    canonical.to_string()
}

/// Maps a legacy alias onto its canonical label; other labels pass through.
#[must_use]
pub fn canonical_version(label: &str) -> &str {
    VERSION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == label)
        .map_or(label, |(_, canonical)| *canonical)
}

/// Whether `label` is one of the verified releases.
///
/// Unsupported versions are not rejected; callers fall back to the default profile.
#[must_use]
pub fn is_supported(label: &str) -> bool {
    let supported = SUPPORTED_VERSIONS.contains(&label.trim());
    if !supported {
        debug!(version = %label, "version not explicitly supported");
    }
    supported
}

/// The verified release labels.
#[must_use]
pub fn supported_versions() -> &'static [&'static str] {
    &SUPPORTED_VERSIONS
}

/// How well a detected version is expected to work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "version", rename_all = "snake_case")]
pub enum Compatibility {
    /// No version could be detected.
    Unknown,
    /// A verified release.
    Supported(String),
    /// Numerically above every verified release.
    Newer(String),
    /// Older, unparseable, or otherwise unverified.
    Unsupported(String),
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(
                f,
                "aMule version could not be detected. Using default parsing configuration."
            ),
            Self::Supported(v) => write!(f, "aMule {v} is fully supported."),
            Self::Newer(v) => write!(
                f,
                "aMule {v} is newer than tested versions. Using default configuration. Please report compatibility issues."
            ),
            Self::Unsupported(v) => write!(
                f,
                "aMule {v} is not officially supported. Using default configuration. Some features may not work correctly."
            ),
        }
    }
}

/// Classifies a detected version label.
#[must_use]
pub fn compatibility(label: &str) -> Compatibility {
    let label = label.trim();
    if label.is_empty() || label == UNKNOWN_VERSION {
        return Compatibility::Unknown;
    }
    if is_supported(label) {
        return Compatibility::Supported(label.to_string());
    }

    let newest = SUPPORTED_VERSIONS
        .iter()
        .filter_map(|v| version_components(v))
        .max();
    match (version_components(label), newest) {
        (Some(detected), Some(newest)) if detected > newest => Compatibility::Newer(label.to_string()),
        _ => Compatibility::Unsupported(label.to_string()),
    }
}

/// Splits `major.minor[.build[.revision]]` into numbers.
fn version_components(label: &str) -> Option<Vec<u32>> {
    let parts = label
        .split('.')
        .map(|part| part.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    (2..=4).contains(&parts.len()).then_some(parts)
}
