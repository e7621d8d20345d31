//! The preference set and its field table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether a preference is a checkbox flag or free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Checkbox; `"1"` in the page script, `"on"` when posted.
    #[serde(rename = "bool")]
    Flag,
    /// Free text (rates, ports, thresholds).
    #[serde(rename = "string")]
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "bool"),
            Self::Text => write!(f, "string"),
        }
    }
}

/// A preference value read from or written to a [`PreferenceSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue<'a> {
    Flag(bool),
    Text(&'a str),
}

/// The daemon's settings as shown on the preferences page.
///
/// Text fields hold exactly what the page holds; no numeric validation is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreferenceSet {
    pub page_refresh_interval: String,
    pub max_download_rate: String,
    pub max_upload_rate: String,
    pub max_download_rate_statistic: String,
    pub max_upload_rate_statistic: String,
    pub slot_allocation: String,
    pub max_total_connections: String,
    pub max_sources_per_file: String,
    pub tcp_port: String,
    pub udp_port: String,
    pub min_free_space_mb: String,
    pub use_gzip_compression: bool,
    pub auto_connect_at_startup: bool,
    pub reconnect_on_lost_connection: bool,
    pub disable_udp_connections: bool,
    pub check_free_space: bool,
    pub new_downloads_auto_priority: bool,
    pub new_shared_auto_priority: bool,
    pub ich_enabled: bool,
    pub aich_trusts_every_hash: bool,
    pub alloc_full_chunks: bool,
    pub alloc_full_disk_space: bool,
    pub new_downloads_paused: bool,
    pub extract_metadata_tags: bool,
}

/// Every field of [`PreferenceSet`], addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PreferenceField {
    PageRefreshInterval,
    MaxDownloadRate,
    MaxUploadRate,
    MaxDownloadRateStatistic,
    MaxUploadRateStatistic,
    SlotAllocation,
    MaxTotalConnections,
    MaxSourcesPerFile,
    TcpPort,
    UdpPort,
    MinFreeSpaceMb,
    UseGzipCompression,
    AutoConnectAtStartup,
    ReconnectOnLostConnection,
    DisableUdpConnections,
    CheckFreeSpace,
    NewDownloadsAutoPriority,
    NewSharedAutoPriority,
    IchEnabled,
    AichTrustsEveryHash,
    AllocFullChunks,
    AllocFullDiskSpace,
    NewDownloadsPaused,
    ExtractMetadataTags,
}

impl PreferenceField {
    /// All fields, in declaration order.
    pub const ALL: [Self; 24] = [
        Self::PageRefreshInterval,
        Self::MaxDownloadRate,
        Self::MaxUploadRate,
        Self::MaxDownloadRateStatistic,
        Self::MaxUploadRateStatistic,
        Self::SlotAllocation,
        Self::MaxTotalConnections,
        Self::MaxSourcesPerFile,
        Self::TcpPort,
        Self::UdpPort,
        Self::MinFreeSpaceMb,
        Self::UseGzipCompression,
        Self::AutoConnectAtStartup,
        Self::ReconnectOnLostConnection,
        Self::DisableUdpConnections,
        Self::CheckFreeSpace,
        Self::NewDownloadsAutoPriority,
        Self::NewSharedAutoPriority,
        Self::IchEnabled,
        Self::AichTrustsEveryHash,
        Self::AllocFullChunks,
        Self::AllocFullDiskSpace,
        Self::NewDownloadsPaused,
        Self::ExtractMetadataTags,
    ];

    /// Field name as it appears in [`PreferenceSet`] and mapping documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::PageRefreshInterval => "page_refresh_interval",
            Self::MaxDownloadRate => "max_download_rate",
            Self::MaxUploadRate => "max_upload_rate",
            Self::MaxDownloadRateStatistic => "max_download_rate_statistic",
            Self::MaxUploadRateStatistic => "max_upload_rate_statistic",
            Self::SlotAllocation => "slot_allocation",
            Self::MaxTotalConnections => "max_total_connections",
            Self::MaxSourcesPerFile => "max_sources_per_file",
            Self::TcpPort => "tcp_port",
            Self::UdpPort => "udp_port",
            Self::MinFreeSpaceMb => "min_free_space_mb",
            Self::UseGzipCompression => "use_gzip_compression",
            Self::AutoConnectAtStartup => "auto_connect_at_startup",
            Self::ReconnectOnLostConnection => "reconnect_on_lost_connection",
            Self::DisableUdpConnections => "disable_udp_connections",
            Self::CheckFreeSpace => "check_free_space",
            Self::NewDownloadsAutoPriority => "new_downloads_auto_priority",
            Self::NewSharedAutoPriority => "new_shared_auto_priority",
            Self::IchEnabled => "ich_enabled",
            Self::AichTrustsEveryHash => "aich_trusts_every_hash",
            Self::AllocFullChunks => "alloc_full_chunks",
            Self::AllocFullDiskSpace => "alloc_full_disk_space",
            Self::NewDownloadsPaused => "new_downloads_paused",
            Self::ExtractMetadataTags => "extract_metadata_tags",
        }
    }

    /// Whether the field is a flag or text.
    #[must_use]
    pub fn kind(self) -> ValueKind {
        match self {
            Self::PageRefreshInterval
            | Self::MaxDownloadRate
            | Self::MaxUploadRate
            | Self::MaxDownloadRateStatistic
            | Self::MaxUploadRateStatistic
            | Self::SlotAllocation
            | Self::MaxTotalConnections
            | Self::MaxSourcesPerFile
            | Self::TcpPort
            | Self::UdpPort
            | Self::MinFreeSpaceMb => ValueKind::Text,
            _ => ValueKind::Flag,
        }
    }
}

impl fmt::Display for PreferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a field name that names no preference.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preference field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for PreferenceField {
    type Err = UnknownField;

    /// Matches field names ignoring case and underscores, so `"TcpPort"`
    /// and `"tcp_port"` both resolve.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|field| squash(field.name()) == wanted)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl PreferenceSet {
    fn text_slot(&mut self, field: PreferenceField) -> Option<&mut String> {
        use PreferenceField as F;
        Some(match field {
            F::PageRefreshInterval => &mut self.page_refresh_interval,
            F::MaxDownloadRate => &mut self.max_download_rate,
            F::MaxUploadRate => &mut self.max_upload_rate,
            F::MaxDownloadRateStatistic => &mut self.max_download_rate_statistic,
            F::MaxUploadRateStatistic => &mut self.max_upload_rate_statistic,
            F::SlotAllocation => &mut self.slot_allocation,
            F::MaxTotalConnections => &mut self.max_total_connections,
            F::MaxSourcesPerFile => &mut self.max_sources_per_file,
            F::TcpPort => &mut self.tcp_port,
            F::UdpPort => &mut self.udp_port,
            F::MinFreeSpaceMb => &mut self.min_free_space_mb,
            _ => return None,
        })
    }

    fn flag_slot(&mut self, field: PreferenceField) -> Option<&mut bool> {
        use PreferenceField as F;
        Some(match field {
            F::UseGzipCompression => &mut self.use_gzip_compression,
            F::AutoConnectAtStartup => &mut self.auto_connect_at_startup,
            F::ReconnectOnLostConnection => &mut self.reconnect_on_lost_connection,
            F::DisableUdpConnections => &mut self.disable_udp_connections,
            F::CheckFreeSpace => &mut self.check_free_space,
            F::NewDownloadsAutoPriority => &mut self.new_downloads_auto_priority,
            F::NewSharedAutoPriority => &mut self.new_shared_auto_priority,
            F::IchEnabled => &mut self.ich_enabled,
            F::AichTrustsEveryHash => &mut self.aich_trusts_every_hash,
            F::AllocFullChunks => &mut self.alloc_full_chunks,
            F::AllocFullDiskSpace => &mut self.alloc_full_disk_space,
            F::NewDownloadsPaused => &mut self.new_downloads_paused,
            F::ExtractMetadataTags => &mut self.extract_metadata_tags,
            _ => return None,
        })
    }

    /// Stores a raw script value: flags are true only for `"1"`, text is kept as is.
    pub fn set_raw(&mut self, field: PreferenceField, raw: &str) {
        if let Some(flag) = self.flag_slot(field) {
            *flag = raw == "1";
        } else if let Some(text) = self.text_slot(field) {
            *text = raw.to_string();
        }
    }

    /// Reads a field.
    #[must_use]
    pub fn get(&self, field: PreferenceField) -> PreferenceValue<'_> {
        use PreferenceField as F;
        match field {
            F::PageRefreshInterval => PreferenceValue::Text(&self.page_refresh_interval),
            F::MaxDownloadRate => PreferenceValue::Text(&self.max_download_rate),
            F::MaxUploadRate => PreferenceValue::Text(&self.max_upload_rate),
            F::MaxDownloadRateStatistic => PreferenceValue::Text(&self.max_download_rate_statistic),
            F::MaxUploadRateStatistic => PreferenceValue::Text(&self.max_upload_rate_statistic),
            F::SlotAllocation => PreferenceValue::Text(&self.slot_allocation),
            F::MaxTotalConnections => PreferenceValue::Text(&self.max_total_connections),
            F::MaxSourcesPerFile => PreferenceValue::Text(&self.max_sources_per_file),
            F::TcpPort => PreferenceValue::Text(&self.tcp_port),
            F::UdpPort => PreferenceValue::Text(&self.udp_port),
            F::MinFreeSpaceMb => PreferenceValue::Text(&self.min_free_space_mb),
            F::UseGzipCompression => PreferenceValue::Flag(self.use_gzip_compression),
            F::AutoConnectAtStartup => PreferenceValue::Flag(self.auto_connect_at_startup),
            F::ReconnectOnLostConnection => PreferenceValue::Flag(self.reconnect_on_lost_connection),
            F::DisableUdpConnections => PreferenceValue::Flag(self.disable_udp_connections),
            F::CheckFreeSpace => PreferenceValue::Flag(self.check_free_space),
            F::NewDownloadsAutoPriority => PreferenceValue::Flag(self.new_downloads_auto_priority),
            F::NewSharedAutoPriority => PreferenceValue::Flag(self.new_shared_auto_priority),
            F::IchEnabled => PreferenceValue::Flag(self.ich_enabled),
            F::AichTrustsEveryHash => PreferenceValue::Flag(self.aich_trusts_every_hash),
            F::AllocFullChunks => PreferenceValue::Flag(self.alloc_full_chunks),
            F::AllocFullDiskSpace => PreferenceValue::Flag(self.alloc_full_disk_space),
            F::NewDownloadsPaused => PreferenceValue::Flag(self.new_downloads_paused),
            F::ExtractMetadataTags => PreferenceValue::Flag(self.extract_metadata_tags),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip_through_from_str() {
        for field in PreferenceField::ALL {
            assert_eq!(field.name().parse::<PreferenceField>().unwrap(), field);
        }
    }

    #[test]
    fn test_from_str_is_loose_about_case_and_underscores() {
        assert_eq!("TcpPort".parse::<PreferenceField>().unwrap(), PreferenceField::TcpPort);
        assert_eq!(
            "MaxUploadRate_Statistic".parse::<PreferenceField>().unwrap(),
            PreferenceField::MaxUploadRateStatistic
        );
        assert!("no_such_field".parse::<PreferenceField>().is_err());
    }

    #[test]
    fn test_kind_split() {
        let text = PreferenceField::ALL
            .iter()
            .filter(|f| f.kind() == ValueKind::Text)
            .count();
        assert_eq!(text, 11);
        assert_eq!(PreferenceField::ALL.len() - text, 13);
    }

    #[test]
    fn test_set_raw_flag_only_one_is_true() {
        let mut prefs = PreferenceSet::default();
        prefs.set_raw(PreferenceField::UseGzipCompression, "1");
        assert!(prefs.use_gzip_compression);
        prefs.set_raw(PreferenceField::UseGzipCompression, "true");
        assert!(!prefs.use_gzip_compression);
    }

    #[test]
    fn test_set_raw_text_and_get() {
        let mut prefs = PreferenceSet::default();
        prefs.set_raw(PreferenceField::TcpPort, "4662");
        assert_eq!(prefs.get(PreferenceField::TcpPort), PreferenceValue::Text("4662"));
        assert_eq!(prefs.get(PreferenceField::IchEnabled), PreferenceValue::Flag(false));
    }

    #[test]
    fn test_every_field_has_exactly_one_slot() {
        let mut prefs = PreferenceSet::default();
        for field in PreferenceField::ALL {
            let text = prefs.text_slot(field).is_some();
            let flag = prefs.flag_slot(field).is_some();
            assert!(text ^ flag, "{field}");
            assert_eq!(text, field.kind() == ValueKind::Text, "{field}");
        }
    }
}
