//! Per-document parsers for the daemon's web pages.
//!
//! Every parser is a pure function of the page markup and a
//! [`VersionProfile`](crate::profile::VersionProfile). Structural failures
//! degrade to an empty list (or `None` for single objects) and are logged at
//! `warn`; nothing here returns an error.
//!
//! Row-oriented documents (downloads, uploads, servers, search results) walk
//! the cell sequence produced by the [`table`] engine through a per-document
//! column layout (see [`cursor`]).

pub mod cursor;
pub mod table;

mod download;
mod log;
mod markup;
mod search;
mod server;
mod stats;
mod upload;

pub use download::{DownloadField, DownloadRecord, completed_percentage, parse_downloads};
pub use log::parse_log;
pub use search::{SearchField, SearchRecord, parse_search_results};
pub use server::{ServerField, ServerRecord, parse_servers};
pub use stats::{StatsRecord, UNKNOWN_STATUS, parse_stats};
pub use upload::{UploadField, UploadRecord, parse_uploads};
