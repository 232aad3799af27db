//! One user's working state: settings, queue and the services acting on them.
//!
//! A [`Session`] is owned by a single control loop. Routing, resolution and
//! downloads all read the current [`Settings`] on each call, so a toggle
//! flipped between calls applies to the next one.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use playlistdl_core::Settings;
//! use playlistdl_core::queue::Selection;
//! use playlistdl_core::session::Session;
//! use playlistdl_core::tool::YtDlp;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::with_defaults(Settings::default(), Arc::new(YtDlp::new()))?;
//! session.ingest("https://soundcloud.com/artist/sets/mix").await;
//! let all = Selection::all(session.queue().len());
//! let report = session.download(&all, None).await?;
//! println!("{}", report.stats);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{MAX_RESOLVE_THREADS, Settings};
use crate::download::{
    BatchReport, DownloadEngine, DownloadError, EngineError, HttpClient, MediaFetcher,
    ProgressCallback,
};
use crate::parser::{normalize, strip_list_numbering};
use crate::pool::StopFlag;
use crate::provider::{HttpTimeouts, YoutubeProvider, build_default_provider_set};
use crate::queue::{Queue, Selection};
use crate::resolver::{Dispatcher, TitleResolution, TitleResolver, TrackSearch};
use crate::tool::YtDlp;
use crate::track::{TrackCandidate, TrackSource};

/// Result of queueing a pasted list of titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListIngest {
    /// Titles found in the paste.
    pub titles: usize,
    /// Candidates appended to the queue.
    pub queued: usize,
    /// Titles no URL was found for, in paste order.
    pub unresolved: Vec<String>,
}

/// Settings, queue and services for one interactive or one-shot run.
pub struct Session {
    settings: Settings,
    queue: Queue,
    dispatcher: Dispatcher,
    search: Arc<dyn TrackSearch>,
    http: HttpClient,
    media: Arc<dyn MediaFetcher>,
    stop: StopFlag,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("queue_len", &self.queue.len())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session from explicit services.
    #[must_use]
    pub fn new(
        settings: Settings,
        dispatcher: Dispatcher,
        search: Arc<dyn TrackSearch>,
        http: HttpClient,
        media: Arc<dyn MediaFetcher>,
    ) -> Self {
        Self {
            settings,
            queue: Queue::new(),
            dispatcher,
            search,
            http,
            media,
            stop: StopFlag::new(),
        }
    }

    /// Creates a session wired to `tool` and the default providers.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the download HTTP client cannot be built.
    pub fn with_defaults(settings: Settings, tool: Arc<YtDlp>) -> Result<Self, DownloadError> {
        let dispatcher = Dispatcher::new(build_default_provider_set(
            Arc::clone(&tool),
            HttpTimeouts::default(),
        ));
        let search: Arc<dyn TrackSearch> = Arc::new(YoutubeProvider::new(Arc::clone(&tool)));
        Ok(Self::new(settings, dispatcher, search, HttpClient::new()?, tool))
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings; changes apply to the next operation.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The queue.
    #[must_use]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Mutable queue access.
    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    /// Handle for requesting a stop of the running batch.
    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Routes `input` and appends the candidates. Returns how many were queued.
    #[instrument(skip(self, input), fields(input_len = input.len()))]
    pub async fn ingest(&mut self, input: &str) -> usize {
        let candidates = self.dispatcher.route(input, &self.settings).await;
        let added = self.queue.append(candidates);
        info!(added, queue_len = self.queue.len(), "queued candidates");
        added
    }

    fn title_resolver(&self) -> TitleResolver {
        TitleResolver::new(Arc::clone(&self.search))
            .with_concurrency(self.settings.resolve_threads.clamp(1, MAX_RESOLVE_THREADS))
            .with_depth(self.settings.search_depth)
    }

    /// Resolves `titles` to URLs without touching the queue.
    pub async fn resolve_titles(&self, titles: &[String]) -> TitleResolution {
        self.title_resolver().resolve_titles(titles).await
    }

    /// Treats `text` as a pasted list: strips list numbering, normalizes the
    /// lines, resolves each title and queues the ones that resolved.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn ingest_list(&mut self, text: &str) -> ListIngest {
        let stripped: Vec<&str> = text.lines().map(strip_list_numbering).collect();
        let titles = normalize(&stripped.join("\n"));
        if titles.is_empty() {
            return ListIngest::default();
        }

        let resolution = self.resolve_titles(&titles).await;
        let mut unresolved = Vec::new();
        let mut resolved = Vec::new();
        for title in &titles {
            match resolution.get(title).flatten() {
                Some(url) => {
                    resolved.push(TrackCandidate::new(title.clone(), url, TrackSource::Youtube));
                }
                None => unresolved.push(title.clone()),
            }
        }

        let queued = self.queue.append(resolved);
        info!(titles = titles.len(), queued, unresolved = unresolved.len(), "list ingested");
        ListIngest {
            titles: titles.len(),
            queued,
            unresolved,
        }
    }

    /// Looks up URLs for every title-only queue item, in place.
    ///
    /// Returns the titles that are still unresolved.
    #[instrument(skip(self))]
    pub async fn resolve_unresolved(&mut self) -> Vec<String> {
        let titles: Vec<String> = self
            .queue
            .unresolved_indices()
            .into_iter()
            .filter_map(|index| self.queue.get(index).map(|c| c.title.clone()))
            .collect();
        if titles.is_empty() {
            return Vec::new();
        }

        let resolution = self.resolve_titles(&titles).await;
        let still_unresolved = resolution.apply_to(self.queue.items_mut());
        info!(
            attempted = resolution.len(),
            resolved = resolution.resolved_count(),
            "queue resolution finished"
        );
        still_unresolved
    }

    /// Downloads the selected queue items and removes the successful ones.
    ///
    /// Failed and skipped items stay queued in their relative order. The
    /// stop flag is cleared once the batch ends.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] when `max_threads` is
    /// outside 1-8.
    #[instrument(skip(self, selection, progress), fields(selected = selection.len()))]
    pub async fn download(
        &mut self,
        selection: &Selection,
        progress: Option<ProgressCallback>,
    ) -> Result<BatchReport, EngineError> {
        let mut engine = DownloadEngine::new(
            self.settings.max_threads,
            self.http.clone(),
            Arc::clone(&self.media),
        )?;
        if let Some(progress) = progress {
            engine = engine.with_progress(progress);
        }

        let items = self.queue.snapshot(selection);
        let report = engine.download_batch(items, &self.settings, &self.stop).await;
        let removed = self.queue.remove(report.successful_indices(selection));
        self.stop.reset();

        info!(removed, remaining = self.queue.len(), "batch applied to queue");
        Ok(report)
    }

    /// Empties the queue. A running batch keeps its own snapshot; stop it
    /// through [`Session::stop_flag`].
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
