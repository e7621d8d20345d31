//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Inspect aMule web interface pages offline.
///
/// Reads a saved page (or an ed2k link list) from FILE or stdin and prints
/// what the library extracts from it as JSON.
#[derive(Parser, Debug)]
#[command(name = "amuleweb")]
#[command(author, version, about)]
pub struct Args {
    /// Kind of document being inspected
    #[arg(value_enum)]
    pub document: Document,

    /// Input file (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Daemon version whose profile to use (detected from the page when omitted)
    #[arg(short = 'd', long)]
    pub daemon_version: Option<String>,

    /// Version profile document (JSON)
    #[arg(long)]
    pub profiles: Option<PathBuf>,

    /// Preference mapping document (JSON)
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Culture used for decimal separators (e.g. en-US, it-IT)
    #[arg(long, default_value = "en-US")]
    pub locale: String,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Document kinds the inspector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Document {
    /// Download list (amuleweb-main-dload.php)
    Downloads,
    /// Upload list (amuleweb-main-dload.php)
    Uploads,
    /// Server list (amuleweb-main-servers.php)
    Servers,
    /// Search results (amuleweb-main-search.php)
    Search,
    /// Connection status (stats.php)
    Stats,
    /// Preferences (amuleweb-main-prefs.php)
    Prefs,
    /// Log (log.php)
    Log,
    /// Version detection and compatibility (footer.php)
    Version,
    /// ed2k links, one per line
    Link,
}
