//! Direct-file search: finds `.mp3` links through the DuckDuckGo HTML endpoint.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::http_client::{HttpTimeouts, build_http_client, fetch_text};
use super::{ProviderContext, ProviderError, ProviderKind, SourceProvider};
use crate::parser::dedupe_preserving_order;
use crate::track::{TrackCandidate, TrackSource};
use crate::user_agent::BROWSER_USER_AGENT;

/// Public HTML search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://duckduckgo.com/html/";

// Literal links, or the percent-encoded target of a result redirect.
#[allow(clippy::expect_used)]
static MP3_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s"'<>]+\.mp3|uddg=([^&"'\s<>]+)"#).expect("mp3 link regex is valid")
});

fn is_mp3_url(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && lower.ends_with(".mp3")
}

/// Extracts `.mp3` links from a results page, in page order, without repeats.
#[must_use]
pub fn extract_mp3_links(body: &str) -> Vec<String> {
    let links = MP3_LINK.captures_iter(body).filter_map(|caps| {
        match caps.get(1) {
            Some(encoded) => urlencoding::decode(encoded.as_str())
                .ok()
                .map(|decoded| decoded.into_owned())
                .filter(|decoded| is_mp3_url(decoded)),
            None => caps.get(0).map(|whole| whole.as_str().to_string()),
        }
    });
    dedupe_preserving_order(links)
}

/// Derives a display title from a file URL: the decoded last path segment
/// without its extension. Falls back to the URL itself.
#[must_use]
pub fn title_from_url(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .unwrap_or_default();

    let decoded = urlencoding::decode(&segment)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or(segment);
    let stem = match decoded.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => decoded.as_str(),
    };
    let title = stem.trim();

    if title.is_empty() {
        url.to_string()
    } else {
        title.to_string()
    }
}

/// Searches the web for directly downloadable audio files.
#[derive(Debug, Clone)]
pub struct DirectFileProvider {
    client: Client,
    endpoint: String,
}

impl DirectFileProvider {
    /// Creates a provider against the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ClientBuild`] when the client cannot be built.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ProviderError> {
        Self::with_endpoint(DEFAULT_SEARCH_ENDPOINT, timeouts)
    }

    /// Creates a provider against a custom endpoint (used by tests).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ClientBuild`] when the client cannot be built.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        timeouts: HttpTimeouts,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client("direct_file", BROWSER_USER_AGENT, timeouts)?,
            endpoint: endpoint.into(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(&self.endpoint, &[("q", format!("{query} filetype:mp3"))])
            .map_err(|e| ProviderError::parse(&self.endpoint, e.to_string()))
    }
}

#[async_trait]
impl SourceProvider for DirectFileProvider {
    fn name(&self) -> &'static str {
        "direct_file"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::DirectFile
    }

    #[instrument(skip(self, ctx))]
    async fn fetch(
        &self,
        input: &str,
        ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        let url = self.search_url(input.trim())?;
        let body = fetch_text(&self.client, url.as_str()).await?;
        let links = extract_mp3_links(&body);
        debug!(found = links.len(), limit = ctx.max_results, "direct-file links found");

        Ok(links
            .into_iter()
            .take(ctx.max_results.max(1))
            .map(|link| TrackCandidate::new(title_from_url(&link), link, TrackSource::DirectFile))
            .collect())
    }
}
