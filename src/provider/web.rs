//! Generic web page provider: track-like list items and paragraphs.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

use super::http_client::{HttpTimeouts, build_http_client, fetch_text};
use super::{ProviderContext, ProviderError, ProviderKind, SourceProvider};
use crate::parser::{attribute_to_performer, clean_line, dedupe_preserving_order, looks_like_track};
use crate::track::{TrackCandidate, TrackSource};
use crate::user_agent;

#[allow(clippy::expect_used)]
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));

#[allow(clippy::expect_used)]
static TEXT_BLOCKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li, p").expect("text block selector is valid"));

/// Tracks found on a page, before attribution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTracks {
    /// Performer label; empty when the page gives none.
    pub performer: String,
    /// Cleaned, track-like, de-duplicated titles in page order.
    pub titles: Vec<String>,
}

impl PageTracks {
    /// Turns the titles into title-only candidates, prefixing bare titles
    /// with the performer.
    #[must_use]
    pub fn into_candidates(self, source: TrackSource) -> Vec<TrackCandidate> {
        self.titles
            .iter()
            .map(|title| {
                TrackCandidate::title_only(attribute_to_performer(&self.performer, title), source)
            })
            .collect()
    }
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Extracts track-like lines from an arbitrary HTML page.
///
/// The performer label is the page title up to its first `-`.
#[must_use]
pub fn extract_generic_tracks(html: &str) -> PageTracks {
    let document = Html::parse_document(html);

    let performer = document
        .select(&TITLE)
        .next()
        .map(element_text)
        .map(|title| {
            title
                .split('-')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    let lines = document
        .select(&TEXT_BLOCKS)
        .map(|element| clean_line(&element_text(element)))
        .filter(|line| looks_like_track(line));

    PageTracks {
        performer,
        titles: dedupe_preserving_order(lines),
    }
}

/// Scrapes any web page for a tracklist.
#[derive(Debug, Clone)]
pub struct WebProvider {
    client: Client,
}

impl WebProvider {
    /// Creates the provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ClientBuild`] when the client cannot be built.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client("web", user_agent::default_user_agent(), timeouts)?,
        })
    }
}

#[async_trait]
impl SourceProvider for WebProvider {
    fn name(&self) -> &'static str {
        "web"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::GenericWeb
    }

    #[instrument(skip(self, _ctx))]
    async fn fetch(
        &self,
        input: &str,
        _ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        let html = fetch_text(&self.client, input.trim()).await?;
        let page = extract_generic_tracks(&html);
        debug!(performer = %page.performer, titles = page.titles.len(), "extracted page tracks");
        Ok(page.into_candidates(TrackSource::GenericWeb))
    }
}
