//! Connection status from the statistics page (`stats.php`).

use serde::Serialize;
use tracing::{debug, info, warn};

use super::table::all_table_texts;
use crate::profile::VersionProfile;

/// Status text before a network's marker is found.
pub const UNKNOWN_STATUS: &str = "Unknown";

const PRIMARY_MARKER: &str = "Ed2k";
const PRIMARY_PREFIX: &str = "Ed2k :";
const SECONDARY_MARKER: &str = "Kad";
const SECONDARY_PREFIX: &str = "Kad :";

/// Connection status of both networks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRecord {
    /// ed2k server network status, e.g. `"Connected"`.
    pub primary: String,
    /// Kad overlay status, e.g. `"Firewalled"`.
    pub secondary: String,
}

impl Default for StatsRecord {
    fn default() -> Self {
        Self {
            primary: UNKNOWN_STATUS.to_string(),
            secondary: UNKNOWN_STATUS.to_string(),
        }
    }
}

/// Scans every table cell for the two network markers.
///
/// Returns `None` only for a blank page. A page without one of the markers
/// leaves that status at [`UNKNOWN_STATUS`].
#[tracing::instrument(skip(html, profile), fields(html_len = html.len()))]
#[must_use]
pub fn parse_stats(html: &str, profile: &VersionProfile) -> Option<StatsRecord> {
    if html.trim().is_empty() {
        warn!("stats page is empty");
        return None;
    }

    let mut stats = StatsRecord::default();
    let mut found_primary = false;
    let mut found_secondary = false;

    for text in all_table_texts(html, &profile.stats_selector, &["td"]) {
        if text.trim().is_empty() {
            continue;
        }
        if text.contains(PRIMARY_MARKER) {
            stats.primary = strip_status(&text, PRIMARY_PREFIX);
            found_primary = true;
            debug!(status = %stats.primary, "primary network status");
        }
        if text.contains(SECONDARY_MARKER) {
            stats.secondary = strip_status(&text, SECONDARY_PREFIX);
            found_secondary = true;
            debug!(status = %stats.secondary, "secondary network status");
        }
        if found_primary && found_secondary {
            break;
        }
    }

    if !found_primary {
        warn!("primary network status not found");
    }
    if !found_secondary {
        warn!("secondary network status not found");
    }
    info!(primary = %stats.primary, secondary = %stats.secondary, "parsed stats");
    Some(stats)
}

fn strip_status(text: &str, prefix: &str) -> String {
    text.replace('\n', "").replace(prefix, "").trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stats_both_networks() {
        let html = "<table><tr><td>Ed2k : Connected</td></tr><tr><td>Kad : Firewalled</td></tr></table>";
        let stats = parse_stats(html, &VersionProfile::default()).unwrap();
        assert_eq!(stats.primary, "Connected");
        assert_eq!(stats.secondary, "Firewalled");
    }

    #[test]
    fn test_parse_stats_strips_line_breaks_and_markup() {
        let html = "<table><tr><td>\n<b>Ed2k :</b>\n Not Connected\n</td><td>Kad :\nConnected</td></tr></table>";
        let stats = parse_stats(html, &VersionProfile::default()).unwrap();
        assert_eq!(stats.primary, "Not Connected");
        assert_eq!(stats.secondary, "Connected");
    }

    #[test]
    fn test_parse_stats_missing_marker_stays_unknown() {
        let html = "<table><tr><td>Ed2k : Connecting</td></tr></table>";
        let stats = parse_stats(html, &VersionProfile::default()).unwrap();
        assert_eq!(stats.primary, "Connecting");
        assert_eq!(stats.secondary, UNKNOWN_STATUS);
    }

    #[test]
    fn test_parse_stats_no_tables_is_default() {
        let stats = parse_stats("<p>nothing</p>", &VersionProfile::default()).unwrap();
        assert_eq!(stats, StatsRecord::default());
    }

    #[test]
    fn test_parse_stats_blank_page_is_none() {
        assert!(parse_stats("  ", &VersionProfile::default()).is_none());
    }

    #[test]
    fn test_parse_stats_nested_tables_scanned() {
        let html = "<table><tr><td><table><tr><td>Kad : Connected</td></tr></table></td></tr></table>";
        let stats = parse_stats(html, &VersionProfile::default()).unwrap();
        assert_eq!(stats.secondary, "Connected");
    }
}
