//! aMule Web Interface Scraping Library
//!
//! This library turns the pages served by the aMule daemon's PHP web
//! interface into typed records, and builds the form parameters that drive
//! the daemon back. It also validates `ed2k://` resource links before they
//! are submitted.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`profile`] - Versioned table/selector profiles and version detection
//! - [`scrape`] - Table extraction and the per-page row parsers
//! - [`prefs`] - Preference script extraction and the field mapping
//! - [`link`] - `ed2k://` link parsing and validation
//! - [`request`] - Outbound form parameters for daemon pages
//! - [`monitor`] - Published status, aggregated speed and the poller
//! - [`locale`] - Decimal separator handling for scraped numbers
//!
//! Fetching pages is left to the caller; see [`monitor::PageSource`].
//!
//! # Example
//!
//! ```
//! use amuleweb_core::{ProfileRegistry, detect_version, parse_link};
//!
//! let version = detect_version("<p>aMule 2.3.3 web interface</p>");
//! let profile = ProfileRegistry::builtin().resolve(&version);
//! assert_eq!(profile.label, "2.3.3");
//!
//! let link = parse_link("ed2k://|file|Ubuntu-20.04.iso|2877227008|5E0A6F1D2C3B4A5D6E7F8A9B0C1D2E3F|/").unwrap();
//! assert_eq!(link.formatted_size(), "2.68 GB");
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod context;
pub mod link;
pub mod locale;
pub mod monitor;
pub mod prefs;
pub mod profile;
pub mod request;
pub mod scrape;

// Re-export commonly used types
pub use context::ScrapeContext;
pub use link::{LinkErrorKind, LinkParseError, ResourceLink, is_valid_link, parse_link};
pub use locale::NumberLocale;
pub use monitor::{AggregatedSpeed, FetchError, PageSource, Poller, StatusMonitor, total_speed};
pub use prefs::{PreferenceField, PreferenceMapping, PreferenceSet, parse_preferences};
pub use profile::{
    Compatibility, ConfigError, ProfileRegistry, VersionProfile, compatibility, detect_version,
};
pub use request::{FormError, FormParams};
pub use scrape::{
    DownloadRecord, SearchRecord, ServerRecord, StatsRecord, UploadRecord, parse_downloads,
    parse_log, parse_search_results, parse_servers, parse_stats, parse_uploads,
};
