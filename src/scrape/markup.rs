//! Helpers for values taken out of table cells.
//!
//! Cell markup is re-serialized by the HTML parser, so non-breaking spaces
//! appear as `&nbsp;`. Link targets come from the parsed `href` attribute and
//! have their entities decoded.

use tracing::{debug, warn};

/// Entity the web interface uses for blank cells and spacing.
pub const NBSP: &str = "&nbsp;";

/// Extracts the `ip` and `port` query parameters of a connection link.
///
/// Each half is `None` when its marker is absent or its value is empty.
#[must_use]
pub fn link_endpoint(href: &str) -> (Option<String>, Option<String>) {
    let address = query_param(href, "ip");
    let port = query_param(href, "port");
    if address.is_none() || port.is_none() {
        warn!(href = %href, "connection link lacks ip or port parameter");
    } else {
        debug!(address = ?address, port = ?port, "extracted connection endpoint");
    }
    (address, port)
}

fn query_param(href: &str, key: &str) -> Option<String> {
    let query = href.split_once('?').map_or(href, |(_, query)| query);
    let query = query.split_once('#').map_or(query, |(query, _)| query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Replaces `&nbsp;` entities with plain spaces.
#[must_use]
pub fn nbsp_to_space(cell: &str) -> String {
    cell.replace(NBSP, " ")
}
