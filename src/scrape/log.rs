//! Daemon and server log pages (`log.php`, `log.php?show=srv`).

use tracing::warn;

use super::table::first_text;
use crate::profile::VersionProfile;

/// Text of the log block, or `None` when the page has none.
#[tracing::instrument(skip(html, profile), fields(html_len = html.len()))]
#[must_use]
pub fn parse_log(html: &str, profile: &VersionProfile) -> Option<String> {
    let text = first_text(html, &profile.log_selector);
    if text.is_none() {
        warn!(selector = %profile.log_selector, "log block not found");
    }
    text
}
