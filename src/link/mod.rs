//! Parsing of `ed2k://` resource links.
//!
//! A resource link names a shareable file by name, size and MD4 hash:
//!
//! ```text
//! ed2k://|file|Ubuntu-20.04.iso|2877227008|5E0A6F1D2C3B4A5D6E7F8A9B0C1D2E3F|/
//! ed2k://|file|Movie.avi|734003200|ABCD1234ABCD1234ABCD1234ABCD1234|h=ZYXW9876|s=10.0.0.1:4662|/
//! ```
//!
//! [`parse_link`] validates every part and reports the first problem as a
//! [`LinkParseError`]; [`is_valid_link`] is a cheap shape check for gating
//! user input before a full parse.

mod error;

use std::fmt;
use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use error::{LinkErrorKind, LinkParseError};

/// Smallest accepted file size in bytes.
pub const MIN_FILE_SIZE: i64 = 1;
/// Largest accepted file size in bytes (16 TiB).
pub const MAX_FILE_SIZE: i64 = 17_592_186_044_416;

const HASH_LEN: usize = 32;
const SCHEME: &str = "ed2k://";

// Size and hash are captured loosely so their validation can report a
// size or hash error instead of a generic format error.
#[allow(clippy::expect_used)]
static LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^ed2k://\|file\|([^|]+)\|([^|]+)\|([^|]+)\|(.*)/$")
        .expect("resource link regex is valid") // Static pattern, safe to panic
});

/// A validated `ed2k://` file link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLink {
    name: String,
    size: i64,
    hash: String,
    hash_set: Option<String>,
    sources: Vec<String>,
    original: String,
}

impl ResourceLink {
    /// Decoded file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File size in bytes, within `MIN_FILE_SIZE..=MAX_FILE_SIZE`.
    #[must_use]
    pub fn size(&self) -> i64 {
        self.size
    }

    /// MD4 hash, 32 upper-case hexadecimal characters.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// AICH hash set from an `h=` field.
    #[must_use]
    pub fn hash_set(&self) -> Option<&str> {
        self.hash_set.as_deref()
    }

    /// Source endpoints from `s=` fields, in link order.
    #[must_use]
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// The text the link was parsed from.
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Size scaled to the largest fitting unit, e.g. `2.68 GB` or `700 MB`.
    #[must_use]
    pub fn formatted_size(&self) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

        #[allow(clippy::cast_precision_loss)]
        let mut len = self.size as f64;
        let mut order = 0;
        while len >= 1024.0 && order < UNITS.len() - 1 {
            order += 1;
            len /= 1024.0;
        }

        let fixed = format!("{len:.2}");
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        format!("{trimmed} {}", UNITS[order])
    }
}

impl fmt::Display for ResourceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_precision_loss)]
        let megabytes = self.size as f64 / (1024.0 * 1024.0);
        let short_hash = self.hash.get(..8).unwrap_or(&self.hash);
        write!(
            f,
            "Ed2k Link: {} ({megabytes:.2} MB) - Hash: {short_hash}...",
            self.name
        )
    }
}

/// Parses and validates an `ed2k://` file link.
///
/// The whole link is percent-decoded before matching and the name is
/// decoded once more, since links copied from browsers are often encoded
/// twice. `+` is kept as is.
///
/// # Errors
///
/// Returns the [`LinkParseError`] for the first check that fails, in this
/// order: blank input, decoding, overall shape, name, size, hash.
#[tracing::instrument(skip(uri), fields(uri_len = uri.len()))]
pub fn parse_link(uri: &str) -> Result<ResourceLink, LinkParseError> {
    if uri.trim().is_empty() {
        warn!("link is empty");
        return Err(LinkParseError::Empty);
    }

    let decoded = urlencoding::decode(uri).map_err(|e| {
        warn!(error = %e, "link decoding failed");
        LinkParseError::encoding(&e)
    })?;

    let Some(caps) = LINK_PATTERN.captures(&decoded) else {
        warn!(prefix = %preview(&decoded), "link has invalid format");
        return Err(LinkParseError::InvalidFormat);
    };
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let name = urlencoding::decode(group(1)).map_err(|e| {
        warn!(error = %e, "link name decoding failed");
        LinkParseError::encoding(&e)
    })?;
    if name.trim().is_empty() {
        warn!("link name is empty after decoding");
        return Err(LinkParseError::MissingName);
    }

    let size = parse_size(group(2))?;
    let hash = parse_hash(group(3))?;
    let (hash_set, sources) = parse_optional_fields(group(4));

    let link = ResourceLink {
        name: name.into_owned(),
        size,
        hash,
        hash_set,
        sources,
        original: uri.to_string(),
    };
    info!(name = %link.name, size = %link.formatted_size(), "parsed resource link");
    Ok(link)
}

/// Cheap shape check: scheme prefix, at least four pipes, and a trailing
/// `/` or `|`. Does not decode, so a `true` here can still fail [`parse_link`].
#[must_use]
pub fn is_valid_link(uri: &str) -> bool {
    if uri.trim().is_empty() {
        return false;
    }
    let has_scheme = uri
        .get(..SCHEME.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(SCHEME));
    has_scheme && uri.matches('|').count() >= 4 && (uri.ends_with('/') || uri.ends_with('|'))
}

fn parse_size(raw: &str) -> Result<i64, LinkParseError> {
    let size = raw.parse::<i64>().map_err(|e| {
        warn!(raw, error = %e, "link size is not an integer");
        match e.kind() {
            IntErrorKind::PosOverflow => LinkParseError::SizeTooLarge { raw: raw.to_string() },
            IntErrorKind::NegOverflow => LinkParseError::SizeTooSmall { raw: raw.to_string() },
            _ => LinkParseError::InvalidSize { raw: raw.to_string() },
        }
    })?;

    if size < MIN_FILE_SIZE {
        warn!(size, "link size too small");
        return Err(LinkParseError::SizeTooSmall { raw: raw.to_string() });
    }
    if size > MAX_FILE_SIZE {
        warn!(size, "link size too large");
        return Err(LinkParseError::SizeTooLarge { raw: raw.to_string() });
    }
    Ok(size)
}

fn parse_hash(raw: &str) -> Result<String, LinkParseError> {
    let hash = raw.to_ascii_uppercase();
    if hash.len() != HASH_LEN || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        warn!(len = hash.len(), "link hash is not 32 hex characters");
        return Err(LinkParseError::InvalidHash { hash });
    }
    Ok(hash)
}

/// Reads `h=` and `s=` fields; anything else is ignored.
fn parse_optional_fields(fields: &str) -> (Option<String>, Vec<String>) {
    let mut hash_set = None;
    let mut sources = Vec::new();

    for field in fields.split('|').filter(|f| !f.is_empty()) {
        if let Some(value) = strip_prefix_ignore_case(field, "h=") {
            debug!(hash_set = %preview(value), "link carries hash set");
            hash_set = Some(value.to_string());
        } else if let Some(value) = strip_prefix_ignore_case(field, "s=") {
            if value.trim().is_empty() {
                continue;
            }
            debug!(source = value, "link carries source");
            sources.push(value.to_string());
        }
    }
    (hash_set, sources)
}

fn strip_prefix_ignore_case<'a>(field: &'a str, prefix: &str) -> Option<&'a str> {
    let head = field.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &field[prefix.len()..])
}

fn preview(text: &str) -> &str {
    let end = text
        .char_indices()
        .nth(50)
        .map_or(text.len(), |(idx, _)| idx);
    &text[..end]
}
