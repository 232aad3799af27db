//! Runtime settings read by the core on every call.
//!
//! Settings are plain data passed by reference into routing, resolution and
//! downloads, so toggling a source takes effect on the next operation. File
//! loading, CLI overrides and saving live in the binary.

use std::path::PathBuf;

use crate::parser::DEFAULT_SETLIST_DOMAIN;
use crate::provider::{DEFAULT_MAX_RESULTS, ProviderContext};
use crate::track::TrackSource;

/// Default download concurrency.
pub const DEFAULT_MAX_THREADS: usize = 4;

/// Highest accepted download concurrency.
pub const MAX_THREADS_LIMIT: usize = 8;

/// Default number of search hits scored per title during resolution.
pub const DEFAULT_SEARCH_DEPTH: usize = 20;

/// Default and highest title-resolution concurrency.
pub const DEFAULT_RESOLVE_THREADS: usize = 8;

/// Highest accepted title-resolution concurrency.
pub const MAX_RESOLVE_THREADS: usize = 8;

/// Highest accepted `max_results` / `search_depth`.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Route free text and YouTube links to YouTube; download YouTube items.
    pub enable_youtube: bool,
    /// Route SoundCloud links; download SoundCloud items.
    pub enable_soundcloud: bool,
    /// Allow the direct-file web search for single-line text.
    pub enable_duckduckgo: bool,
    /// Download direct file links.
    pub enable_direct_file: bool,
    /// Master switch for downloads.
    pub allow_downloads: bool,
    /// Hits requested from search providers.
    pub max_results: usize,
    /// Hits scored per title when resolving title-only candidates.
    pub search_depth: usize,
    /// Download concurrency (1-8).
    pub max_threads: usize,
    /// Title-resolution concurrency (1-8).
    pub resolve_threads: usize,
    /// Directory downloads are written to.
    pub download_dir: PathBuf,
    /// Domain whose pages use the setlist extractor.
    pub setlist_domain: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_youtube: true,
            enable_soundcloud: true,
            enable_duckduckgo: true,
            enable_direct_file: true,
            allow_downloads: true,
            max_results: DEFAULT_MAX_RESULTS,
            search_depth: DEFAULT_SEARCH_DEPTH,
            max_threads: DEFAULT_MAX_THREADS,
            resolve_threads: DEFAULT_RESOLVE_THREADS,
            download_dir: default_download_dir(),
            setlist_domain: DEFAULT_SETLIST_DOMAIN.to_string(),
        }
    }
}

/// `$HOME/Music`, or `./Music` when `HOME` is unset.
#[must_use]
pub fn default_download_dir() -> PathBuf {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map_or_else(|| PathBuf::from("Music"), |home| PathBuf::from(home).join("Music"))
}

impl Settings {
    /// Context handed to providers.
    #[must_use]
    pub fn provider_context(&self) -> ProviderContext {
        ProviderContext {
            max_results: self.max_results,
        }
    }

    /// Returns false when downloads from `source` are switched off.
    #[must_use]
    pub fn is_source_enabled(&self, source: TrackSource) -> bool {
        match source {
            TrackSource::Youtube => self.enable_youtube,
            TrackSource::SoundCloud => self.enable_soundcloud,
            TrackSource::DirectFile => self.enable_direct_file,
            TrackSource::GenericWeb | TrackSource::Unknown => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.enable_youtube);
        assert!(settings.enable_soundcloud);
        assert!(settings.enable_duckduckgo);
        assert!(settings.enable_direct_file);
        assert!(settings.allow_downloads);
        assert_eq!(settings.max_results, 10);
        assert_eq!(settings.search_depth, 20);
        assert_eq!(settings.max_threads, 4);
        assert_eq!(settings.resolve_threads, 8);
        assert_eq!(settings.setlist_domain, "setlist.fm");
        assert!(settings.download_dir.ends_with("Music"));
    }

    #[test]
    fn test_is_source_enabled_follows_toggles() {
        let settings = Settings {
            enable_youtube: false,
            enable_direct_file: false,
            ..Settings::default()
        };
        assert!(!settings.is_source_enabled(TrackSource::Youtube));
        assert!(!settings.is_source_enabled(TrackSource::DirectFile));
        assert!(settings.is_source_enabled(TrackSource::SoundCloud));
        assert!(settings.is_source_enabled(TrackSource::GenericWeb));
        assert!(settings.is_source_enabled(TrackSource::Unknown));
    }

    #[test]
    fn test_provider_context_uses_max_results() {
        let settings = Settings {
            max_results: 3,
            ..Settings::default()
        };
        assert_eq!(settings.provider_context().max_results, 3);
    }
}
