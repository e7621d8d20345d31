//! Script variable name to preference field mapping.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::model::{PreferenceField, ValueKind};
use crate::profile::ConfigError;

/// Mapping compiled into the crate, as `(script key, field)`.
const BUILTIN: [(&str, PreferenceField); 24] = [
    ("autorefresh_time", PreferenceField::PageRefreshInterval),
    ("max_down_limit", PreferenceField::MaxDownloadRate),
    ("max_up_limit", PreferenceField::MaxUploadRate),
    ("max_line_down_cap", PreferenceField::MaxDownloadRateStatistic),
    ("max_line_up_cap", PreferenceField::MaxUploadRateStatistic),
    ("slot_alloc", PreferenceField::SlotAllocation),
    ("max_conn_total", PreferenceField::MaxTotalConnections),
    ("max_file_src", PreferenceField::MaxSourcesPerFile),
    ("tcp_port", PreferenceField::TcpPort),
    ("udp_port", PreferenceField::UdpPort),
    ("min_free_space", PreferenceField::MinFreeSpaceMb),
    ("use_gzip", PreferenceField::UseGzipCompression),
    ("autoconn_en", PreferenceField::AutoConnectAtStartup),
    ("reconn_en", PreferenceField::ReconnectOnLostConnection),
    ("udp_dis", PreferenceField::DisableUdpConnections),
    ("check_free_space", PreferenceField::CheckFreeSpace),
    ("new_files_auto_dl_prio", PreferenceField::NewDownloadsAutoPriority),
    ("new_files_auto_ul_prio", PreferenceField::NewSharedAutoPriority),
    ("ich_en", PreferenceField::IchEnabled),
    ("aich_trust", PreferenceField::AichTrustsEveryHash),
    ("upload_full_chunks", PreferenceField::AllocFullChunks),
    ("alloc_full", PreferenceField::AllocFullDiskSpace),
    ("new_files_paused", PreferenceField::NewDownloadsPaused),
    ("extract_metadata", PreferenceField::ExtractMetadataTags),
];

#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(default, alias = "Mappings")]
    mappings: HashMap<String, MappingEntry>,
}

#[derive(Debug, Deserialize)]
struct MappingEntry {
    #[serde(alias = "property", alias = "Property")]
    field: String,
    #[serde(alias = "type", alias = "Type", default = "default_kind")]
    kind: ValueKind,
}

fn default_kind() -> ValueKind {
    ValueKind::Text
}

/// Validated, read-only lookup from script variable name to field.
///
/// Every entry names a real field whose kind matches, so lookups never need
/// further checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceMapping {
    entries: BTreeMap<String, PreferenceField>,
}

impl PreferenceMapping {
    /// The compiled-in mapping covering every field.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(key, field)| ((*key).to_string(), *field))
                .collect(),
        }
    }

    /// Parses and validates a mapping document.
    ///
    /// Entries naming an unknown field, or declaring a kind that disagrees
    /// with the field, are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for invalid JSON and
    /// [`ConfigError::Empty`] when no entry survives validation.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let document: MappingDocument =
            serde_json::from_str(raw).map_err(|source| ConfigError::Malformed {
                document: "preference mapping",
                source,
            })?;

        let mut entries = BTreeMap::new();
        for (key, entry) in document.mappings {
            let field = match entry.field.parse::<PreferenceField>() {
                Ok(field) => field,
                Err(e) => {
                    warn!(key = %key, error = %e, "dropping preference mapping");
                    continue;
                }
            };
            if field.kind() != entry.kind {
                warn!(
                    key = %key,
                    field = %field,
                    declared = %entry.kind,
                    actual = %field.kind(),
                    "dropping preference mapping with mismatched kind"
                );
                continue;
            }
            entries.insert(key, field);
        }

        if entries.is_empty() {
            return Err(ConfigError::Empty {
                document: "preference mapping",
            });
        }
        debug!(entries = entries.len(), "validated preference mapping");
        Ok(Self { entries })
    }

    /// Reads a mapping document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`PreferenceMapping::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json_str(&raw)
    }

    /// Loads `path` if given, otherwise or on any failure the built-in mapping.
    #[must_use]
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::builtin();
        };
        match Self::load(path) {
            Ok(mapping) => {
                info!(path = %path.display(), entries = mapping.len(), "loaded preference mapping");
                mapping
            }
            Err(e) => {
                warn!(error = %e, "preference mapping unusable, using built-in mapping");
                Self::builtin()
            }
        }
    }

    /// Field for a script variable name.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<PreferenceField> {
        self.entries.get(key).copied()
    }

    /// `(script key, field)` pairs, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PreferenceField)> {
        self.entries.iter().map(|(key, field)| (key.as_str(), *field))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PreferenceMapping {
    fn default() -> Self {
        Self::builtin()
    }
}
