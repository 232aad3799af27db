//! Title → URL resolution for title-only candidates.
//!
//! Each title is searched independently on a bounded worker pool and the best
//! fuzzy match is kept. Every submitted title gets exactly one entry in the
//! result, resolved or not.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::similarity::token_sort_ratio;
use crate::config::{DEFAULT_RESOLVE_THREADS, DEFAULT_SEARCH_DEPTH, MAX_RESOLVE_THREADS};
use crate::parser::dedupe_preserving_order;
use crate::pool::{SlotResult, WorkerPool};
use crate::provider::ProviderError;
use crate::track::{TrackCandidate, TrackSource};

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Result title as the source shows it.
    pub title: String,
    /// Playable URL.
    pub url: String,
}

impl SearchHit {
    /// Creates a hit.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Converts the hit into a YouTube candidate.
    #[must_use]
    pub fn into_candidate(self) -> TrackCandidate {
        TrackCandidate::new(self.title, self.url, TrackSource::Youtube)
    }
}

/// Search capability used to resolve titles.
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Returns up to `limit` hits for `query`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError>;
}

/// Picks the hit whose title is most similar to `target`.
///
/// Ties keep the earliest hit. Hits scoring zero never match.
#[must_use]
pub fn best_match<'a>(target: &str, hits: &'a [SearchHit]) -> Option<&'a SearchHit> {
    let mut best: Option<(&SearchHit, u8)> = None;
    for hit in hits {
        let score = token_sort_ratio(target, &hit.title);
        if score > best.map_or(0, |(_, best_score)| best_score) {
            best = Some((hit, score));
        }
    }
    best.map(|(hit, _)| hit)
}

/// Result of resolving a batch of titles: one entry per distinct title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleResolution {
    entries: Vec<(String, Option<String>)>,
    positions: HashMap<String, usize>,
}

impl TitleResolution {
    /// Records a title's outcome. A repeated title keeps its first entry.
    pub fn insert(&mut self, title: impl Into<String>, url: Option<String>) {
        let title = title.into();
        if self.positions.contains_key(&title) {
            return;
        }
        self.positions.insert(title.clone(), self.entries.len());
        self.entries.push((title, url));
    }

    /// Number of distinct titles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Outer `None`: the title was never submitted. Inner `None`: no match.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<Option<&str>> {
        self.positions
            .get(title)
            .map(|&index| self.entries[index].1.as_deref())
    }

    /// Entries in submission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(title, url)| (title.as_str(), url.as_deref()))
    }

    /// Number of titles that found a URL.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|(_, url)| url.is_some()).count()
    }

    /// Titles that found nothing, in submission order.
    #[must_use]
    pub fn unresolved(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, url)| url.is_none())
            .map(|(title, _)| title.as_str())
            .collect()
    }

    /// Attaches resolved URLs to title-only candidates.
    ///
    /// Updated candidates become YouTube candidates. Returns the titles of
    /// candidates that are still unresolved, without repeats.
    pub fn apply_to(&self, candidates: &mut [TrackCandidate]) -> Vec<String> {
        let mut still_unresolved = Vec::new();
        for candidate in candidates.iter_mut().filter(|c| !c.is_resolved()) {
            if let Some(Some(url)) = self.get(&candidate.title) {
                candidate.url = Some(url.to_string());
                candidate.source = TrackSource::Youtube;
            } else {
                still_unresolved.push(candidate.title.clone());
            }
        }
        dedupe_preserving_order(still_unresolved)
    }
}

/// Resolves titles to URLs through a [`TrackSearch`] on a bounded pool.
#[derive(Clone)]
pub struct TitleResolver {
    search: Arc<dyn TrackSearch>,
    concurrency: usize,
    depth: usize,
}

impl std::fmt::Debug for TitleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleResolver")
            .field("concurrency", &self.concurrency)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl TitleResolver {
    /// Creates a resolver with the default pool size and search depth.
    #[must_use]
    pub fn new(search: Arc<dyn TrackSearch>) -> Self {
        Self {
            search,
            concurrency: DEFAULT_RESOLVE_THREADS,
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    /// Sets the number of concurrent searches, clamped to `1..=8`.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_RESOLVE_THREADS);
        self
    }

    /// Sets how many hits are scored per title (minimum 1).
    #[must_use]
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth.max(1);
        self
    }

    /// Effective pool size.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Resolves every title. Duplicate titles are searched once.
    ///
    /// A failed search or a search with no positive match records `None`
    /// for that title; other titles are unaffected.
    #[instrument(skip(self, titles), fields(titles = titles.len(), concurrency = self.concurrency))]
    pub async fn resolve_titles(&self, titles: &[String]) -> TitleResolution {
        let unique = dedupe_preserving_order(titles.iter().cloned());
        debug!(distinct = unique.len(), "resolving titles");

        let search = Arc::clone(&self.search);
        let depth = self.depth;
        let slots = WorkerPool::new(self.concurrency)
            .run(unique.clone(), None, move |_, title: String| {
                let search = Arc::clone(&search);
                async move {
                    match search.search(&title, depth).await {
                        Ok(hits) => {
                            let found = best_match(&title, &hits).map(|hit| hit.url.clone());
                            debug!(%title, hits = hits.len(), matched = found.is_some(), "title searched");
                            found
                        }
                        Err(error) => {
                            warn!(%title, error = %error, "title search failed");
                            None
                        }
                    }
                }
            })
            .await;

        let mut resolution = TitleResolution::default();
        for (title, slot) in unique.into_iter().zip(slots) {
            let url = match slot {
                SlotResult::Done(url) => url,
                SlotResult::NotStarted | SlotResult::Panicked(_) => None,
            };
            resolution.insert(title, url);
        }

        info!(
            total = resolution.len(),
            resolved = resolution.resolved_count(),
            "title resolution finished"
        );
        resolution
    }
}
