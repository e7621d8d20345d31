//! Extraction of `initvals["key"] = "value";` statements from the page script.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use super::mapping::PreferenceMapping;
use super::model::PreferenceSet;
use crate::profile::VersionProfile;
use crate::scrape::table::element_contents;

/// Marker identifying the preferences script and opening its assignment block.
const START_MARKER: &str = "initvals[";
/// Marker closing the assignment block.
const END_MARKER: &str = "<!--";

#[allow(clippy::expect_used)]
static STATEMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*initvals\[\s*"([^"]+)"\s*\]\s*=\s*"([^"]*)"\s*$"#)
        .expect("preference statement regex is valid") // Static pattern, safe to panic
});

/// Parses the preferences page into a fresh [`PreferenceSet`].
///
/// Returns `None` for a blank page or one without script blocks.
#[tracing::instrument(skip(html, profile, mapping), fields(html_len = html.len()))]
#[must_use]
pub fn parse_preferences(
    html: &str,
    profile: &VersionProfile,
    mapping: &PreferenceMapping,
) -> Option<PreferenceSet> {
    apply_preferences(html, profile, mapping, &PreferenceSet::default())
}

/// Parses the preferences page on top of `base`.
///
/// Fields the page does not mention keep their value from `base`. The result
/// is built on a copy, so `base` is never seen half updated.
#[must_use]
pub fn apply_preferences(
    html: &str,
    profile: &VersionProfile,
    mapping: &PreferenceMapping,
    base: &PreferenceSet,
) -> Option<PreferenceSet> {
    if html.trim().is_empty() {
        warn!("preferences page is empty");
        return None;
    }

    let scripts = element_contents(html, &profile.script_selector);
    if scripts.is_empty() {
        warn!("no script blocks on preferences page");
        return None;
    }

    let mut prefs = base.clone();
    match scripts.iter().find(|script| script.contains("initvals")) {
        Some(script) => {
            let applied = apply_script(script, mapping, &mut prefs);
            info!(applied, "parsed preferences");
        }
        None => warn!("no preference script on page"),
    }
    Some(prefs)
}

/// Applies every mapped assignment in `script` to `prefs`, returning how many were applied.
///
/// Unknown keys and statements that are not assignments are skipped.
pub fn apply_script(script: &str, mapping: &PreferenceMapping, prefs: &mut PreferenceSet) -> usize {
    let Some(start) = script.find(START_MARKER) else {
        warn!("preference assignments not found in script");
        return 0;
    };
    let region = &script[start..];
    let region = match region.find(END_MARKER) {
        Some(end) => &region[..end],
        None => {
            debug!("no end marker after assignments, reading to end of script");
            region
        }
    };

    let mut applied = 0;
    for statement in region.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((key, value)) = parse_statement(statement) else {
            continue;
        };
        match mapping.field(key) {
            Some(field) => {
                prefs.set_raw(field, value);
                applied += 1;
                debug!(key, field = %field, value, "applied preference");
            }
            None => debug!(key, "no mapping for preference key"),
        }
    }
    applied
}

/// Splits `initvals["key"] = "value"` into key and value.
fn parse_statement(statement: &str) -> Option<(&str, &str)> {
    let caps = STATEMENT_PATTERN.captures(statement)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
