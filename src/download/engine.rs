//! Download engine for bounded-concurrency batch downloads.
//!
//! # Overview
//!
//! [`DownloadEngine::download_batch`] takes a snapshot of queue items and
//! returns one [`DownloadOutcome`] per item, in input order:
//!
//! - items without a URL, or whose source or downloads are switched off,
//!   are skipped before anything runs
//! - YouTube and SoundCloud items go through the [`MediaFetcher`]
//! - everything else is streamed over HTTP by [`HttpClient`]
//!
//! Work runs on a [`WorkerPool`]. The [`StopFlag`] is checked before each
//! item starts; items still waiting at that point are skipped, while items
//! already running finish. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use playlistdl_core::download::{DownloadEngine, HttpClient};
//! use playlistdl_core::pool::StopFlag;
//! use playlistdl_core::tool::YtDlp;
//! use playlistdl_core::{Settings, TrackCandidate, TrackSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = DownloadEngine::new(4, HttpClient::new()?, Arc::new(YtDlp::new()))?;
//! let items = vec![TrackCandidate::new("Song", "https://youtu.be/abc", TrackSource::Youtube)];
//! let report = engine.download_batch(items, &Settings::default(), &StopFlag::new()).await;
//! println!("{}", report.stats);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::media::MediaFetcher;
use super::outcome::{
    BatchReport, DownloadOutcome, SKIP_DOWNLOADS_DISABLED, SKIP_SOURCE_DISABLED, SKIP_STOPPED,
    SKIP_UNRESOLVED,
};
use super::{DownloadError, HttpClient};
use crate::config::{DEFAULT_MAX_THREADS, MAX_THREADS_LIMIT, Settings};
use crate::pool::{SlotResult, StopFlag, WorkerPool};
use crate::track::TrackCandidate;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = MAX_THREADS_LIMIT;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = DEFAULT_MAX_THREADS;

/// Error type for download engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Called once per finished item with its batch position and outcome.
pub type ProgressCallback = Arc<dyn Fn(usize, &DownloadOutcome) + Send + Sync>;

/// What to do with one item, decided before any work starts.
enum Plan {
    Skip(&'static str),
    Fetch { url: String, via_tool: bool },
}

impl Plan {
    fn for_item(item: &TrackCandidate, settings: &Settings) -> Self {
        let Some(url) = item
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return Self::Skip(SKIP_UNRESOLVED);
        };
        if !settings.allow_downloads {
            return Self::Skip(SKIP_DOWNLOADS_DISABLED);
        }
        if !settings.is_source_enabled(item.source) {
            return Self::Skip(SKIP_SOURCE_DISABLED);
        }
        Self::Fetch {
            url: url.to_string(),
            via_tool: item.source.uses_media_tool(),
        }
    }
}

/// Bounded-concurrency batch downloader.
#[derive(Clone)]
pub struct DownloadEngine {
    pool: WorkerPool,
    http: HttpClient,
    media: Arc<dyn MediaFetcher>,
    progress: Option<ProgressCallback>,
}

impl fmt::Debug for DownloadEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadEngine")
            .field("concurrency", &self.pool.concurrency())
            .field("progress", &self.progress.is_some())
            .finish_non_exhaustive()
    }
}

impl DownloadEngine {
    /// Creates an engine running at most `concurrency` downloads at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// 1-8.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use playlistdl_core::download::{DownloadEngine, HttpClient};
    /// use playlistdl_core::tool::YtDlp;
    ///
    /// let engine = DownloadEngine::new(4, HttpClient::new().unwrap(), Arc::new(YtDlp::new())).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// assert!(DownloadEngine::new(0, HttpClient::new().unwrap(), Arc::new(YtDlp::new())).is_err());
    /// ```
    #[instrument(level = "debug", skip(http, media))]
    pub fn new(
        concurrency: usize,
        http: HttpClient,
        media: Arc<dyn MediaFetcher>,
    ) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating download engine");
        Ok(Self {
            pool: WorkerPool::new(concurrency),
            http,
            media,
            progress: None,
        })
    }

    /// Reports each finished item to `callback` as it completes.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.pool.concurrency()
    }

    /// Downloads `items` into `settings.download_dir`.
    ///
    /// Never fails as a whole: every per-item problem is recorded in that
    /// item's outcome, and the report's statistics always add up to the
    /// number of items.
    #[instrument(skip_all, fields(items = items.len(), concurrency = self.concurrency()))]
    pub async fn download_batch(
        &self,
        items: Vec<TrackCandidate>,
        settings: &Settings,
        stop: &StopFlag,
    ) -> BatchReport {
        let mut outcomes: Vec<DownloadOutcome> = Vec::with_capacity(items.len());
        let mut job_positions = Vec::new();
        let mut jobs = Vec::new();

        for (position, item) in items.iter().enumerate() {
            match Plan::for_item(item, settings) {
                Plan::Skip(reason) => {
                    debug!(title = %item.title, reason, "skipping item");
                    outcomes.push(DownloadOutcome::skipped(reason));
                }
                Plan::Fetch { url, via_tool } => {
                    // Placeholder until the job reports back.
                    outcomes.push(DownloadOutcome::skipped(SKIP_STOPPED));
                    job_positions.push(position);
                    jobs.push((position, url, via_tool));
                }
            }
        }

        if !jobs.is_empty() {
            let dir = settings.download_dir.clone();
            match tokio::fs::create_dir_all(&dir).await {
                Ok(()) => {
                    let slots = self.run_jobs(jobs, dir, stop).await;
                    for (position, slot) in job_positions.into_iter().zip(slots) {
                        outcomes[position] = match slot {
                            SlotResult::Done(outcome) => outcome,
                            SlotResult::NotStarted => DownloadOutcome::skipped(SKIP_STOPPED),
                            SlotResult::Panicked(message) => {
                                DownloadOutcome::Failed(format!("worker panicked: {message}"))
                            }
                        };
                    }
                }
                Err(source) => {
                    let reason = DownloadError::io(dir, source).to_string();
                    warn!(%reason, "cannot create download directory");
                    for position in job_positions {
                        outcomes[position] = DownloadOutcome::Failed(reason.clone());
                    }
                }
            }
        }

        let report = BatchReport::new(outcomes);
        info!(
            total = report.stats.total,
            success = report.stats.success,
            failed = report.stats.failed,
            skipped = report.stats.skipped,
            "batch finished"
        );
        report
    }

    async fn run_jobs(
        &self,
        jobs: Vec<(usize, String, bool)>,
        dir: PathBuf,
        stop: &StopFlag,
    ) -> Vec<SlotResult<DownloadOutcome>> {
        let http = self.http.clone();
        let media = Arc::clone(&self.media);
        let progress = self.progress.clone();
        let dir = Arc::new(dir);

        self.pool
            .run(jobs, Some(stop), move |_, (position, url, via_tool)| {
                let http = http.clone();
                let media = Arc::clone(&media);
                let progress = progress.clone();
                let dir = Arc::clone(&dir);
                async move {
                    let result = if via_tool {
                        media.fetch_audio(&url, &dir).await
                    } else {
                        http.download_to_file(&url, &dir).await
                    };
                    let outcome = match result {
                        Ok(path) => {
                            info!(%url, path = %path.display(), "downloaded");
                            DownloadOutcome::Success(path)
                        }
                        Err(error) => {
                            warn!(%url, error = %error, "download failed");
                            DownloadOutcome::Failed(error.to_string())
                        }
                    };
                    if let Some(progress) = &progress {
                        progress(position, &outcome);
                    }
                    outcome
                }
            })
            .await
    }
}
