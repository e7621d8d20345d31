//! Builders for each daemon form.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use super::error::FormError;
use super::{FormParams, SERVER_PAGE};
use crate::prefs::{PreferenceMapping, PreferenceSet, PreferenceValue};

/// Longest search text the search form accepts, in characters.
pub const MAX_SEARCH_LENGTH: usize = 100;

const ALL_CATEGORIES: &str = "all";
const SIZE_UNIT: &str = "MByte";

/// Actions the download page applies to checked files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadCommand {
    Pause,
    Resume,
    Delete,
    Cancel,
    Priority,
}

impl DownloadCommand {
    /// Form value for the `command` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Delete => "delete",
            Self::Cancel => "cancel",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for DownloadCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadCommand {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "delete" => Ok(Self::Delete),
            "cancel" => Ok(Self::Cancel),
            "priority" => Ok(Self::Priority),
            _ => Err(FormError::UnknownCommand {
                command: s.to_string(),
            }),
        }
    }
}

/// Which network a search runs on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchType {
    #[default]
    Global,
    Local,
    Kad,
}

impl SearchType {
    /// Form value for the `searchtype` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Local => "Local",
            Self::Kad => "Kad",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            "kad" => Ok(Self::Kad),
            _ => Err(FormError::UnknownSearchType {
                search_type: s.to_string(),
            }),
        }
    }
}

/// Server list actions, sent as a query on the server page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerAction {
    Connect,
    Remove,
}

impl ServerAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Remove => "remove",
        }
    }
}

/// Parameters applying `command` to the download files `ids`.
///
/// # Errors
///
/// Returns [`FormError::NoFileIds`] for an empty list and
/// [`FormError::InvalidFileId`] for an id that is not numeric.
pub fn download_command_params<S: AsRef<str>>(
    ids: &[S],
    command: DownloadCommand,
) -> Result<FormParams, FormError> {
    if ids.is_empty() {
        warn!(%command, "download command without file ids");
        return Err(FormError::NoFileIds);
    }

    let mut params = FormParams::new();
    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() || id.parse::<i64>().is_err() {
            warn!(id, %command, "rejecting non-numeric file id");
            return Err(FormError::invalid_id(id));
        }
        params.push(id, "on");
    }
    params.push("category", ALL_CATEGORIES);
    params.push("command", command.as_str());
    params.push("status", ALL_CATEGORIES);

    debug!(files = ids.len(), %command, "built download command");
    Ok(params)
}

/// Parameters submitting one or more links, one per line, to the footer form.
///
/// The form takes several links in one field joined by `+`.
#[must_use]
pub fn link_submission_params(link_text: &str) -> FormParams {
    let joined = link_text.replace("\r\n", "+").replace(['\r', '\n'], "+");

    let mut params = FormParams::new();
    params.push("Submit", "Download link");
    params.push("ed2klink", joined);
    params.push("selectcat", ALL_CATEGORIES);
    params
}

/// Parameters starting a search.
///
/// The text is HTML-escaped before it is sent. An empty `target_category`
/// means all categories.
///
/// # Errors
///
/// Returns [`FormError::EmptySearch`] for blank text and
/// [`FormError::SearchTooLong`] past [`MAX_SEARCH_LENGTH`] characters.
pub fn search_params(
    text: &str,
    search_type: SearchType,
    target_category: Option<&str>,
) -> Result<FormParams, FormError> {
    if text.trim().is_empty() {
        warn!("search text is empty");
        return Err(FormError::EmptySearch);
    }
    let length = text.chars().count();
    if length > MAX_SEARCH_LENGTH {
        warn!(length, max = MAX_SEARCH_LENGTH, "search text too long");
        return Err(FormError::SearchTooLong {
            length,
            max: MAX_SEARCH_LENGTH,
        });
    }

    let escaped = html_escape::encode_quoted_attribute(text);
    let category = target_category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(ALL_CATEGORIES);

    let mut params = FormParams::new();
    params.push("command", "search");
    params.push("searchval", escaped);
    params.push("Search", "Search");
    params.push("avail", "");
    params.push("minsize", "");
    params.push("minsizeu", SIZE_UNIT);
    params.push("searchtype", search_type.as_str());
    params.push("maxsize", "");
    params.push("maxsizeu", SIZE_UNIT);
    params.push("targetcat", category);

    debug!(%search_type, category, length, "built search");
    Ok(params)
}

/// Parameters queueing search result `result_id` for download.
///
/// # Errors
///
/// Returns [`FormError::Blank`] for an empty id.
pub fn search_download_params(result_id: &str) -> Result<FormParams, FormError> {
    let result_id = result_id.trim();
    if result_id.is_empty() {
        return Err(FormError::Blank { field: "search result id" });
    }

    let mut params = FormParams::new();
    params.push("command", "download");
    params.push("searchval", "");
    params.push("avail", "");
    params.push("minsize", "");
    params.push("minsizeu", SIZE_UNIT);
    params.push("searchtype", SearchType::Global.as_str());
    params.push("maxsize", "");
    params.push("maxsizeu", SIZE_UNIT);
    params.push(result_id, "on");
    params.push("Download", "Download");
    params.push("targetcat", ALL_CATEGORIES);
    Ok(params)
}

/// Server page path with the query for `action` on server `id:port`.
///
/// `id` and `port` are the values [`crate::scrape::ServerRecord`] carries.
///
/// # Errors
///
/// Returns [`FormError::Blank`] when either value is empty.
pub fn server_action_path(action: ServerAction, id: &str, port: &str) -> Result<String, FormError> {
    if id.trim().is_empty() {
        return Err(FormError::Blank { field: "server id" });
    }
    if port.trim().is_empty() {
        return Err(FormError::Blank { field: "server port" });
    }
    Ok(format!(
        "{SERVER_PAGE}?cmd={}&ip={}&port={}",
        action.as_str(),
        urlencoding::encode(id.trim()),
        urlencoding::encode(port.trim())
    ))
}

/// Parameters saving `prefs` through the preferences form.
///
/// Uses `mapping` in reverse: text fields are always sent, flags only when
/// set, as `"on"`. Unchecked boxes are simply absent, which is how the form
/// itself clears them.
#[must_use]
pub fn preference_params(prefs: &PreferenceSet, mapping: &PreferenceMapping) -> FormParams {
    let mut params = FormParams::new();
    for (key, field) in mapping.iter() {
        match prefs.get(field) {
            PreferenceValue::Text(value) => params.push(key, value),
            PreferenceValue::Flag(true) => params.push(key, "on"),
            PreferenceValue::Flag(false) => {}
        }
    }
    params.push("Submit", "Apply");
    params.push("command", "");
    debug!(params = params.len(), "built preference update");
    params
}
