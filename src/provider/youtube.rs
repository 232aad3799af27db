//! YouTube provider: search phrases, playlists and single videos via yt-dlp.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{ProviderContext, ProviderError, ProviderKind, SourceProvider};
use crate::parser::{InputKind, classify_input, description_tracklist};
use crate::resolver::{SearchHit, TrackSearch};
use crate::tool::YtDlp;
use crate::track::{TrackCandidate, TrackSource};

/// Flat listing produced by `-J --flat-playlist` for searches and playlists.
#[derive(Debug, Deserialize)]
struct FlatListing {
    #[serde(default)]
    entries: Vec<Option<FlatEntry>>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: Option<String>,
    title: Option<String>,
}

/// Full metadata for a single video.
#[derive(Debug, Deserialize)]
struct VideoInfo {
    id: Option<String>,
    title: Option<String>,
    webpage_url: Option<String>,
    description: Option<String>,
    uploader: Option<String>,
}

/// Canonical watch URL for a video id.
#[must_use]
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Drops the `&si=` share-tracking suffix from a playlist link.
#[must_use]
pub fn strip_share_tracking(url: &str) -> &str {
    url.find("&si=").map_or(url, |pos| &url[..pos])
}

/// Parses a flat listing into hits. Entries without an id or title are skipped.
fn parse_flat_listing(json: &str, input: &str) -> Result<Vec<SearchHit>, ProviderError> {
    let listing: FlatListing =
        serde_json::from_str(json).map_err(|e| ProviderError::parse(input, e.to_string()))?;

    let total = listing.entries.len();
    let hits: Vec<SearchHit> = listing
        .entries
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            let id = entry.id.filter(|id| !id.trim().is_empty())?;
            let title = entry.title.filter(|t| !t.trim().is_empty())?;
            Some(SearchHit::new(title, watch_url(&id)))
        })
        .collect();

    debug!(input, total, usable = hits.len(), "parsed flat listing");
    Ok(hits)
}

/// Parses single-video metadata.
///
/// A description carrying a tracklist (a mix or a full album upload) yields
/// one title-only candidate per listed track, attributed to the uploader.
/// Otherwise the video itself is the only candidate.
fn parse_video_info(json: &str, input: &str) -> Result<Vec<TrackCandidate>, ProviderError> {
    let info: VideoInfo =
        serde_json::from_str(json).map_err(|e| ProviderError::parse(input, e.to_string()))?;

    let listed = description_tracklist(
        info.description.as_deref().unwrap_or_default(),
        info.uploader.as_deref().unwrap_or_default(),
    );
    if !listed.is_empty() {
        debug!(input, tracks = listed.len(), "using tracklist from video description");
        return Ok(listed
            .into_iter()
            .map(|title| TrackCandidate::title_only(title, TrackSource::Youtube))
            .collect());
    }

    let title = info
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ProviderError::parse(input, "video has no title"))?;
    let url = info
        .webpage_url
        .or_else(|| info.id.as_deref().map(watch_url))
        .unwrap_or_else(|| input.to_string());

    Ok(vec![TrackCandidate::new(title, url, TrackSource::Youtube)])
}

/// YouTube search, playlist enumeration and single-video lookup.
#[derive(Debug, Clone)]
pub struct YoutubeProvider {
    tool: Arc<YtDlp>,
}

impl YoutubeProvider {
    /// Creates a provider backed by the given tool handle.
    #[must_use]
    pub fn new(tool: Arc<YtDlp>) -> Self {
        Self { tool }
    }

    /// Runs a `ytsearchN:` query and returns up to `limit` hits.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the tool fails or prints unexpected JSON.
    #[instrument(skip(self))]
    pub async fn search_videos(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, ProviderError> {
        let target = format!("ytsearch{}:{query}", limit.max(1));
        let json = self
            .tool
            .capture(&["--flat-playlist", "-J", "--no-warnings", &target])
            .await?;
        parse_flat_listing(&json, &target)
    }

    /// Enumerates a playlist without resolving each entry.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the tool fails or prints unexpected JSON.
    #[instrument(skip(self))]
    pub async fn playlist(&self, url: &str) -> Result<Vec<TrackCandidate>, ProviderError> {
        let url = strip_share_tracking(url);
        let json = self
            .tool
            .capture(&["--flat-playlist", "-J", "--no-warnings", url])
            .await?;
        Ok(parse_flat_listing(&json, url)?
            .into_iter()
            .map(SearchHit::into_candidate)
            .collect())
    }

    /// Looks up a single video, or the tracks listed in its description.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the tool fails or the video has no title.
    #[instrument(skip(self))]
    pub async fn video(&self, url: &str) -> Result<Vec<TrackCandidate>, ProviderError> {
        let json = self
            .tool
            .capture(&["-J", "--no-playlist", "--no-warnings", url])
            .await?;
        parse_video_info(&json, url)
    }
}

#[async_trait]
impl SourceProvider for YoutubeProvider {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Youtube
    }

    async fn fetch(
        &self,
        input: &str,
        ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        match classify_input(input, "") {
            InputKind::YoutubePlaylistUrl => self.playlist(input.trim()).await,
            InputKind::Text => Ok(self
                .search_videos(input.trim(), ctx.max_results)
                .await?
                .into_iter()
                .map(SearchHit::into_candidate)
                .collect()),
            _ => self.video(input.trim()).await,
        }
    }
}

#[async_trait]
impl TrackSearch for YoutubeProvider {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        self.search_videos(query, limit).await
    }
}
