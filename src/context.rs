//! Everything a parse call needs besides the markup.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::locale::NumberLocale;
use crate::prefs::{PreferenceMapping, PreferenceSet, apply_preferences, parse_preferences};
use crate::profile::{ProfileRegistry, VersionProfile, detect_version};
use crate::scrape::{
    DownloadRecord, SearchRecord, ServerRecord, StatsRecord, UploadRecord, parse_downloads,
    parse_log, parse_search_results, parse_servers, parse_stats, parse_uploads,
};

/// The resolved profile, preference mapping and number locale for one daemon.
///
/// Immutable once built; wrap it in an [`Arc`] to share it between tasks.
#[derive(Debug, Clone)]
pub struct ScrapeContext {
    profile: Arc<VersionProfile>,
    mapping: Arc<PreferenceMapping>,
    locale: NumberLocale,
}

impl ScrapeContext {
    #[must_use]
    pub fn new(profile: Arc<VersionProfile>, mapping: Arc<PreferenceMapping>, locale: NumberLocale) -> Self {
        Self {
            profile,
            mapping,
            locale,
        }
    }

    /// Resolves `version` against `registry`.
    #[must_use]
    pub fn for_version(
        registry: &ProfileRegistry,
        version: &str,
        mapping: Arc<PreferenceMapping>,
        locale: NumberLocale,
    ) -> Self {
        Self::new(registry.resolve(version), mapping, locale)
    }

    /// Detects the daemon version from `footer_html` and resolves its profile.
    #[must_use]
    pub fn detect(
        registry: &ProfileRegistry,
        footer_html: &str,
        mapping: Arc<PreferenceMapping>,
        locale: NumberLocale,
    ) -> Self {
        let version = detect_version(footer_html);
        let context = Self::for_version(registry, &version, mapping, locale);
        info!(detected = %version, profile = %context.profile.label, "resolved scrape context");
        context
    }

    /// Builds a context from optional config files, falling back to the
    /// built-in profiles and mapping for anything missing or unusable.
    #[must_use]
    pub fn from_config(
        profiles: Option<&Path>,
        mapping: Option<&Path>,
        version: &str,
        locale: NumberLocale,
    ) -> Self {
        let registry = ProfileRegistry::load_or_builtin(profiles);
        let mapping = Arc::new(PreferenceMapping::load_or_builtin(mapping));
        Self::for_version(&registry, version, mapping, locale)
    }

    #[must_use]
    pub fn profile(&self) -> &VersionProfile {
        &self.profile
    }

    #[must_use]
    pub fn mapping(&self) -> &PreferenceMapping {
        &self.mapping
    }

    #[must_use]
    pub fn locale(&self) -> NumberLocale {
        self.locale
    }

    #[must_use]
    pub fn downloads(&self, html: &str) -> Vec<DownloadRecord> {
        parse_downloads(html, &self.profile, self.locale)
    }

    #[must_use]
    pub fn uploads(&self, html: &str) -> Vec<UploadRecord> {
        parse_uploads(html, &self.profile)
    }

    #[must_use]
    pub fn servers(&self, html: &str) -> Vec<ServerRecord> {
        parse_servers(html, &self.profile)
    }

    #[must_use]
    pub fn search_results(&self, html: &str) -> Vec<SearchRecord> {
        parse_search_results(html, &self.profile)
    }

    #[must_use]
    pub fn stats(&self, html: &str) -> Option<StatsRecord> {
        parse_stats(html, &self.profile)
    }

    #[must_use]
    pub fn preferences(&self, html: &str) -> Option<PreferenceSet> {
        parse_preferences(html, &self.profile, &self.mapping)
    }

    /// Like [`ScrapeContext::preferences`], keeping values from `base` the page omits.
    #[must_use]
    pub fn preferences_over(&self, html: &str, base: &PreferenceSet) -> Option<PreferenceSet> {
        apply_preferences(html, &self.profile, &self.mapping, base)
    }

    #[must_use]
    pub fn log(&self, html: &str) -> Option<String> {
        parse_log(html, &self.profile)
    }
}

impl Default for ScrapeContext {
    fn default() -> Self {
        Self::new(
            Arc::new(VersionProfile::default()),
            Arc::new(PreferenceMapping::builtin()),
            NumberLocale::default(),
        )
    }
}
