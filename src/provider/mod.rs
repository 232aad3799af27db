//! Source providers: turn one query or URL into track candidates.
//!
//! # Architecture
//!
//! - [`SourceProvider`] - async trait each source implements
//! - [`ProviderKind`] - closed set of sources used for routing
//! - [`ProviderSet`] - one registered provider per kind
//! - [`YoutubeProvider`], [`SoundCloudProvider`] - backed by yt-dlp
//! - [`WebProvider`], [`SetlistProvider`], [`DirectFileProvider`] - HTML scraping
//!
//! Providers are independent. [`SourceProvider::resolve`] never fails: a
//! provider error is logged and the provider contributes nothing, so one
//! broken source cannot abort the others.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use playlistdl_core::provider::{HttpTimeouts, ProviderContext, ProviderKind, build_default_provider_set};
//! use playlistdl_core::tool::YtDlp;
//!
//! # async fn example() {
//! let providers = build_default_provider_set(Arc::new(YtDlp::new()), HttpTimeouts::default());
//! if let Some(web) = providers.get(ProviderKind::GenericWeb) {
//!     let tracks = web.resolve("https://example.com/tracklist", &ProviderContext::default()).await;
//!     println!("{} tracks", tracks.len());
//! }
//! # }
//! ```

mod direct_file;
mod error;
mod http_client;
mod setlist;
mod soundcloud;
mod web;
mod youtube;

pub use direct_file::{DEFAULT_SEARCH_ENDPOINT, DirectFileProvider, extract_mp3_links, title_from_url};
pub use error::ProviderError;
pub use http_client::{HttpTimeouts, build_http_client};
pub use setlist::{SetlistProvider, extract_setlist_tracks};
pub use soundcloud::SoundCloudProvider;
pub use web::{PageTracks, WebProvider, extract_generic_tracks};
pub use youtube::{YoutubeProvider, strip_share_tracking, watch_url};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::tool::YtDlp;
use crate::track::TrackCandidate;

/// Default number of hits requested from a search provider.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Source a provider serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// YouTube search, playlists and videos.
    Youtube,
    /// SoundCloud sets.
    SoundCloud,
    /// Any other web page.
    GenericWeb,
    /// Setlist pages.
    Setlist,
    /// Direct audio file search.
    DirectFile,
}

impl ProviderKind {
    /// Stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::SoundCloud => "soundcloud",
            Self::GenericWeb => "web",
            Self::Setlist => "setlist",
            Self::DirectFile => "direct_file",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call knobs passed to providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderContext {
    /// Upper bound on hits for search-style providers.
    pub max_results: usize,
}

impl Default for ProviderContext {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// A pluggable source of track candidates.
///
/// Uses `async_trait` so providers can live in a [`ProviderSet`] as trait
/// objects.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Source this provider serves.
    fn kind(&self) -> ProviderKind;

    /// Gathers candidates, reporting failures.
    async fn fetch(
        &self,
        input: &str,
        ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError>;

    /// Gathers candidates, converting any failure into an empty result.
    ///
    /// Candidates with a blank title are dropped here as well.
    async fn resolve(&self, input: &str, ctx: &ProviderContext) -> Vec<TrackCandidate> {
        match self.fetch(input, ctx).await {
            Ok(candidates) => {
                let found = candidates.len();
                let candidates: Vec<TrackCandidate> = candidates
                    .into_iter()
                    .filter(TrackCandidate::has_title)
                    .collect();
                if candidates.len() < found {
                    debug!(
                        provider = self.name(),
                        dropped = found - candidates.len(),
                        "dropped untitled candidates"
                    );
                }
                info!(provider = self.name(), count = candidates.len(), "provider finished");
                candidates
            }
            Err(error) => {
                warn!(
                    provider = self.name(),
                    error = %error,
                    "provider failed; continuing without its results"
                );
                Vec::new()
            }
        }
    }
}

/// Registered providers, at most one per [`ProviderKind`].
#[derive(Default)]
pub struct ProviderSet {
    providers: Vec<Arc<dyn SourceProvider>>,
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.name()))
            .finish()
    }
}

impl ProviderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider, replacing any previous one of the same kind.
    pub fn register(&mut self, provider: Arc<dyn SourceProvider>) {
        let kind = provider.kind();
        self.providers.retain(|existing| existing.kind() != kind);
        debug!(provider = provider.name(), %kind, "registered provider");
        self.providers.push(provider);
    }

    /// Returns the provider for `kind`, if one is registered.
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Option<&Arc<dyn SourceProvider>> {
        self.providers.iter().find(|p| p.kind() == kind)
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Builds the full provider set used by the session.
///
/// Scraping providers that fail to construct are logged and left out; the
/// rest still register.
#[must_use]
pub fn build_default_provider_set(tool: Arc<YtDlp>, timeouts: HttpTimeouts) -> ProviderSet {
    let mut set = ProviderSet::new();

    set.register(Arc::new(YoutubeProvider::new(Arc::clone(&tool))));
    set.register(Arc::new(SoundCloudProvider::new(tool)));

    match SetlistProvider::new(timeouts) {
        Ok(provider) => set.register(Arc::new(provider)),
        Err(error) => warn!(
            error = %error,
            "setlist provider unavailable; setlist pages will use the generic scraper"
        ),
    }

    match WebProvider::new(timeouts) {
        Ok(provider) => set.register(Arc::new(provider)),
        Err(error) => warn!(
            error = %error,
            "web provider unavailable; continuing with remaining providers"
        ),
    }

    match DirectFileProvider::new(timeouts) {
        Ok(provider) => set.register(Arc::new(provider)),
        Err(error) => warn!(
            error = %error,
            "direct-file provider unavailable; continuing with remaining providers"
        ),
    }

    set
}
