//! CLI entry point for the aMule web interface inspector.

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use amuleweb_core::{
    NumberLocale, ScrapeContext, compatibility, detect_version, link::LinkErrorKind, parse_link,
};
use clap::Parser;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info};

mod cli;

use cli::{Args, Document};

const CONFIG_DIR: &str = "amuleweb";
const PROFILES_FILE: &str = "profiles.json";
const MAPPING_FILE: &str = "preferences.json";

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays valid JSON.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let input = read_input(args.file.as_deref())?;
    let output = inspect(&args, &input)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()));
    }
    if io::stdin().is_terminal() {
        bail!("no input: pass a FILE or pipe the page on stdin");
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    Ok(buffer)
}

fn inspect(args: &Args, input: &str) -> Result<Value> {
    match args.document {
        Document::Version => {
            let version = detect_version(input);
            let report = compatibility(&version);
            info!(%version, "detected daemon version");
            Ok(json!({
                "version": version,
                "compatibility": report,
                "message": report.to_string(),
            }))
        }
        Document::Link => Ok(Value::Array(
            input
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(link_report)
                .collect(),
        )),
        document => {
            let context = scrape_context(args, input);
            info!(profile = %context.profile().label, locale = %context.locale(), "using profile");
            scrape(&context, document, input)
        }
    }
}

fn scrape(context: &ScrapeContext, document: Document, html: &str) -> Result<Value> {
    Ok(match document {
        Document::Downloads => to_json(&context.downloads(html))?,
        Document::Uploads => to_json(&context.uploads(html))?,
        Document::Servers => to_json(&context.servers(html))?,
        Document::Search => to_json(&context.search_results(html))?,
        Document::Stats => to_json(&context.stats(html))?,
        Document::Prefs => to_json(&context.preferences(html))?,
        Document::Log => to_json(&context.log(html))?,
        Document::Version | Document::Link => Value::Null,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).context("failed to serialize result")
}

#[derive(Serialize)]
struct LinkFailure<'a> {
    input: &'a str,
    kind: LinkErrorKind,
    message: String,
}

fn link_report(line: &str) -> Value {
    match parse_link(line) {
        Ok(link) => json!({
            "link": link,
            "formattedSize": link.formatted_size(),
        }),
        Err(e) => json!({
            "error": LinkFailure {
                input: line,
                kind: e.kind(),
                message: e.to_string(),
            },
        }),
    }
}

fn scrape_context(args: &Args, input: &str) -> ScrapeContext {
    let version = args
        .daemon_version
        .clone()
        .unwrap_or_else(|| detect_version(input));
    let config_dir = default_config_dir();
    let profiles = args
        .profiles
        .clone()
        .or_else(|| existing(config_dir.as_deref(), PROFILES_FILE));
    let mapping = args
        .mapping
        .clone()
        .or_else(|| existing(config_dir.as_deref(), MAPPING_FILE));

    ScrapeContext::from_config(
        profiles.as_deref(),
        mapping.as_deref(),
        &version,
        NumberLocale::from_culture(&args.locale),
    )
}

/// `$XDG_CONFIG_HOME/amuleweb`, else `$HOME/.config/amuleweb`.
fn default_config_dir() -> Option<PathBuf> {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .map(|dir| dir.join(CONFIG_DIR))
}

fn existing(dir: Option<&Path>, file: &str) -> Option<PathBuf> {
    let path = dir?.join(file);
    path.is_file().then(|| {
        debug!(path = %path.display(), "found config file");
        path
    })
}
