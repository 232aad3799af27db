//! Input routing and title resolution.
//!
//! - [`Dispatcher`] classifies an input and sends it to the matching
//!   provider(s), returning one ordered candidate list.
//! - [`TitleResolver`] finds URLs for title-only candidates by fuzzy
//!   matching search hits.
//!
//! The dispatcher never resolves title-only candidates on its own; callers
//! decide when to spend searches on them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use playlistdl_core::Settings;
//! use playlistdl_core::provider::{HttpTimeouts, build_default_provider_set};
//! use playlistdl_core::resolver::Dispatcher;
//! use playlistdl_core::tool::YtDlp;
//!
//! # async fn example() {
//! let dispatcher = Dispatcher::new(build_default_provider_set(
//!     Arc::new(YtDlp::new()),
//!     HttpTimeouts::default(),
//! ));
//! let candidates = dispatcher.route("boards of canada roygbiv", &Settings::default()).await;
//! println!("{} candidates", candidates.len());
//! # }
//! ```

mod similarity;
mod title_match;

pub use similarity::{token_sort_key, token_sort_ratio};
pub use title_match::{SearchHit, TitleResolution, TitleResolver, TrackSearch, best_match};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::{MAX_RESOLVE_THREADS, Settings};
use crate::parser::{InputKind, classify_input, clean_line, normalize};
use crate::pool::WorkerPool;
use crate::provider::{ProviderContext, ProviderKind, ProviderSet, SourceProvider};
use crate::track::{TrackCandidate, TrackSource};

/// Routes inputs to providers.
#[derive(Debug, Default)]
pub struct Dispatcher {
    providers: ProviderSet,
}

impl Dispatcher {
    /// Creates a dispatcher over the given providers.
    #[must_use]
    pub fn new(providers: ProviderSet) -> Self {
        Self { providers }
    }

    /// Registered providers.
    #[must_use]
    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    /// Classifies `input` using the configured setlist domain.
    #[must_use]
    pub fn classify(input: &str, settings: &Settings) -> InputKind {
        classify_input(input, &settings.setlist_domain)
    }

    /// Turns one input into candidates.
    ///
    /// Links go to the provider for their site. Free text is searched on
    /// YouTube when it is enabled (each normalized line of a multi-line
    /// paste is its own search). Otherwise a multi-line paste becomes
    /// title-only candidates, and a single line goes to the direct-file
    /// search, or becomes one title-only candidate when that is off too.
    ///
    /// Disabled sources and provider failures contribute nothing.
    #[instrument(skip(self, input, settings), fields(input_len = input.len()))]
    pub async fn route(&self, input: &str, settings: &Settings) -> Vec<TrackCandidate> {
        let input = input.trim();
        if input.is_empty() {
            debug!("empty input");
            return Vec::new();
        }

        let ctx = settings.provider_context();
        let kind = Self::classify(input, settings);
        debug!(%kind, "classified input");

        let candidates = match kind {
            InputKind::SoundCloudUrl => {
                self.call(ProviderKind::SoundCloud, settings.enable_soundcloud, input, &ctx)
                    .await
            }
            InputKind::YoutubePlaylistUrl | InputKind::YoutubeVideoUrl => {
                self.call(ProviderKind::Youtube, settings.enable_youtube, input, &ctx)
                    .await
            }
            InputKind::SetlistUrl => {
                let kind = if self.providers.get(ProviderKind::Setlist).is_some() {
                    ProviderKind::Setlist
                } else {
                    ProviderKind::GenericWeb
                };
                self.call(kind, true, input, &ctx).await
            }
            InputKind::WebUrl => self.call(ProviderKind::GenericWeb, true, input, &ctx).await,
            InputKind::Text => self.route_text(input, settings, &ctx).await,
        };

        info!(%kind, count = candidates.len(), "input routed");
        candidates
    }

    /// Routes several inputs in order and concatenates the results.
    pub async fn route_all<S: AsRef<str>>(
        &self,
        inputs: &[S],
        settings: &Settings,
    ) -> Vec<TrackCandidate> {
        let mut all = Vec::new();
        for input in inputs {
            all.extend(self.route(input.as_ref(), settings).await);
        }
        all
    }

    async fn route_text(
        &self,
        input: &str,
        settings: &Settings,
        ctx: &ProviderContext,
    ) -> Vec<TrackCandidate> {
        let multi_line = input.lines().filter(|l| !l.trim().is_empty()).count() > 1;

        if settings.enable_youtube {
            let queries = if multi_line {
                normalize(input)
            } else {
                vec![input.to_string()]
            };
            return self.search_each(queries, settings, ctx).await;
        }

        if multi_line {
            let titles = normalize(input);
            debug!(titles = titles.len(), "treating text as a tracklist");
            return titles
                .into_iter()
                .map(|title| TrackCandidate::title_only(title, TrackSource::Unknown))
                .collect();
        }

        if settings.enable_duckduckgo {
            return self.call(ProviderKind::DirectFile, true, input, ctx).await;
        }

        let cleaned = clean_line(input);
        let title = if cleaned.is_empty() {
            input.to_string()
        } else {
            cleaned
        };
        vec![TrackCandidate::title_only(title, TrackSource::Unknown)]
    }

    /// Runs one YouTube search per query on the worker pool, keeping query order.
    async fn search_each(
        &self,
        queries: Vec<String>,
        settings: &Settings,
        ctx: &ProviderContext,
    ) -> Vec<TrackCandidate> {
        let Some(provider) = self.provider(ProviderKind::Youtube) else {
            return Vec::new();
        };
        if queries.len() == 1 {
            return provider.resolve(&queries[0], ctx).await;
        }

        let ctx = *ctx;
        let pool = WorkerPool::new(settings.resolve_threads.clamp(1, MAX_RESOLVE_THREADS));
        pool.run(queries, None, move |_, query: String| {
            let provider = Arc::clone(&provider);
            async move { provider.resolve(&query, &ctx).await }
        })
        .await
        .into_iter()
        .filter_map(crate::pool::SlotResult::done)
        .flatten()
        .collect()
    }

    fn provider(&self, kind: ProviderKind) -> Option<Arc<dyn SourceProvider>> {
        let provider = self.providers.get(kind).cloned();
        if provider.is_none() {
            warn!(%kind, "no provider registered for source");
        }
        provider
    }

    async fn call(
        &self,
        kind: ProviderKind,
        enabled: bool,
        input: &str,
        ctx: &ProviderContext,
    ) -> Vec<TrackCandidate> {
        if !enabled {
            info!(%kind, "source disabled; skipping");
            return Vec::new();
        }
        match self.provider(kind) {
            Some(provider) => provider.resolve(input, ctx).await,
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::ProviderError;

    /// Echoes each input back as one candidate titled `{kind}:{input}`.
    struct Echo {
        kind: ProviderKind,
        seen: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl SourceProvider for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }

        async fn fetch(
            &self,
            input: &str,
            ctx: &ProviderContext,
        ) -> Result<Vec<TrackCandidate>, ProviderError> {
            self.seen.lock().unwrap().push(input.to_string());
            if self.fail {
                return Err(ProviderError::parse(input, "broken"));
            }
            let source = match self.kind {
                ProviderKind::Youtube => TrackSource::Youtube,
                ProviderKind::SoundCloud => TrackSource::SoundCloud,
                ProviderKind::DirectFile => TrackSource::DirectFile,
                ProviderKind::GenericWeb | ProviderKind::Setlist => TrackSource::GenericWeb,
            };
            assert!(ctx.max_results > 0);
            Ok(vec![TrackCandidate::new(
                format!("{}:{input}", self.kind),
                "https://x.test/1",
                source,
            )])
        }
    }

    struct Fixture {
        dispatcher: Dispatcher,
        seen: Arc<Mutex<Vec<String>>>,
    }

    fn fixture(failing: &[ProviderKind]) -> Fixture {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut set = ProviderSet::new();
        for kind in [
            ProviderKind::Youtube,
            ProviderKind::SoundCloud,
            ProviderKind::GenericWeb,
            ProviderKind::Setlist,
            ProviderKind::DirectFile,
        ] {
            set.register(Arc::new(Echo {
                kind,
                seen: Arc::clone(&seen),
                fail: failing.contains(&kind),
            }));
        }
        Fixture {
            dispatcher: Dispatcher::new(set),
            seen,
        }
    }

    fn titles(candidates: &[TrackCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_routes_urls_by_site() {
        let f = fixture(&[]);
        let settings = Settings::default();
        let cases = [
            ("https://soundcloud.com/a/sets/b", "soundcloud:"),
            ("https://www.youtube.com/playlist?list=PL1", "youtube:"),
            ("https://youtu.be/abc", "youtube:"),
            ("https://www.setlist.fm/setlist/x.html", "setlist:"),
            ("https://example.com/list", "web:"),
        ];
        for (input, prefix) in cases {
            let out = f.dispatcher.route(input, &settings).await;
            assert_eq!(out.len(), 1, "{input}");
            assert!(out[0].title.starts_with(prefix), "{input} -> {}", out[0].title);
        }
    }

    #[tokio::test]
    async fn test_single_line_text_searches_youtube() {
        let f = fixture(&[]);
        let out = f.dispatcher.route("  daft punk  ", &Settings::default()).await;
        assert_eq!(titles(&out), vec!["youtube:daft punk"]);
    }

    #[tokio::test]
    async fn test_multi_line_text_searches_each_normalized_line_in_order() {
        let f = fixture(&[]);
        let raw = "Artist - Song One\n\nSong Two [HD]\n0:00";
        let out = f.dispatcher.route(raw, &Settings::default()).await;
        assert_eq!(
            titles(&out),
            vec!["youtube:Artist - Song One", "youtube:Song Two"]
        );
    }

    #[tokio::test]
    async fn test_multi_line_text_without_youtube_is_tracklist() {
        let f = fixture(&[]);
        let settings = Settings {
            enable_youtube: false,
            ..Settings::default()
        };
        let out = f
            .dispatcher
            .route("Artist - Song One\nSong Two\n12:34 [Official Video] https://x.com", &settings)
            .await;
        assert_eq!(titles(&out), vec!["Artist - Song One", "Song Two"]);
        assert!(out.iter().all(|c| !c.is_resolved() && c.source == TrackSource::Unknown));
        assert!(f.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_line_without_youtube_uses_direct_file_search() {
        let f = fixture(&[]);
        let settings = Settings {
            enable_youtube: false,
            ..Settings::default()
        };
        let out = f.dispatcher.route("rare bootleg", &settings).await;
        assert_eq!(titles(&out), vec!["direct_file:rare bootleg"]);
    }

    #[tokio::test]
    async fn test_single_line_with_every_search_off_is_title_only() {
        let f = fixture(&[]);
        let settings = Settings {
            enable_youtube: false,
            enable_duckduckgo: false,
            ..Settings::default()
        };
        let out = f.dispatcher.route("Song (Live) [HD]", &settings).await;
        assert_eq!(out, vec![TrackCandidate::title_only("Song", TrackSource::Unknown)]);
    }

    #[tokio::test]
    async fn test_disabled_sources_contribute_nothing() {
        let f = fixture(&[]);
        let settings = Settings {
            enable_youtube: false,
            enable_soundcloud: false,
            ..Settings::default()
        };
        assert!(f.dispatcher.route("https://youtu.be/abc", &settings).await.is_empty());
        assert!(
            f.dispatcher
                .route("https://soundcloud.com/a/sets/b", &settings)
                .await
                .is_empty()
        );
        assert!(f.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_provider_does_not_abort_others() {
        let f = fixture(&[ProviderKind::SoundCloud]);
        let inputs = [
            "https://soundcloud.com/a/sets/b",
            "https://example.com/list",
        ];
        let out = f.dispatcher.route_all(&inputs[..], &Settings::default()).await;
        assert_eq!(titles(&out), vec!["web:https://example.com/list"]);
        assert_eq!(f.seen.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_custom_setlist_domain() {
        let f = fixture(&[]);
        let settings = Settings {
            setlist_domain: "gigs.example.org".to_string(),
            ..Settings::default()
        };
        let out = f.dispatcher.route("https://gigs.example.org/show/1", &settings).await;
        assert!(out[0].title.starts_with("setlist:"));
        let out = f.dispatcher.route("https://www.setlist.fm/x", &settings).await;
        assert!(out[0].title.starts_with("web:"));
    }

    #[tokio::test]
    async fn test_missing_provider_yields_nothing() {
        let dispatcher = Dispatcher::default();
        assert!(dispatcher.route("https://example.com", &Settings::default()).await.is_empty());
        assert!(dispatcher.route("", &Settings::default()).await.is_empty());
    }
}
