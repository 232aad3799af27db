//! SoundCloud provider: playlist enumeration through streamed yt-dlp records.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, trace};

use super::{ProviderContext, ProviderError, ProviderKind, SourceProvider};
use crate::parser::description_tracklist;
use crate::tool::YtDlp;
use crate::track::{TrackCandidate, TrackSource};

#[derive(Debug, Deserialize)]
struct TrackRecord {
    title: Option<String>,
    webpage_url: Option<String>,
    url: Option<String>,
    description: Option<String>,
    uploader: Option<String>,
}

/// Parses one `--dump-json` line.
///
/// An upload whose description lists a tracklist (a mix) is replaced by
/// title-only candidates for the listed tracks. Blank, malformed or untitled
/// records yield nothing.
fn parse_record(line: &str) -> Vec<TrackCandidate> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    let record: TrackRecord = match serde_json::from_str(line) {
        Ok(record) => record,
        Err(error) => {
            trace!(%error, "skipping malformed record");
            return Vec::new();
        }
    };

    let Some(title) = record.title.filter(|t| !t.trim().is_empty()) else {
        return Vec::new();
    };

    let listed = description_tracklist(
        record.description.as_deref().unwrap_or_default(),
        record.uploader.as_deref().unwrap_or_default(),
    );
    if !listed.is_empty() {
        debug!(%title, tracks = listed.len(), "using tracklist from upload description");
        return listed
            .into_iter()
            .map(|track| TrackCandidate::title_only(track, TrackSource::SoundCloud))
            .collect();
    }

    match record.webpage_url.or(record.url) {
        Some(url) => vec![TrackCandidate::new(title, url, TrackSource::SoundCloud)],
        None => vec![TrackCandidate::title_only(title, TrackSource::SoundCloud)],
    }
}

/// Enumerates SoundCloud sets and tracks.
#[derive(Debug, Clone)]
pub struct SoundCloudProvider {
    tool: Arc<YtDlp>,
}

impl SoundCloudProvider {
    /// Creates a provider backed by the given tool handle.
    #[must_use]
    pub fn new(tool: Arc<YtDlp>) -> Self {
        Self { tool }
    }
}

#[async_trait]
impl SourceProvider for SoundCloudProvider {
    fn name(&self) -> &'static str {
        "soundcloud"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::SoundCloud
    }

    #[instrument(skip(self, _ctx))]
    async fn fetch(
        &self,
        input: &str,
        _ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        let mut candidates = Vec::new();
        let mut skipped = 0usize;

        let lines = self
            .tool
            .stream_lines(
                &[
                    "--dump-json",
                    "--ignore-errors",
                    "--yes-playlist",
                    "--no-warnings",
                    input.trim(),
                ],
                |line| {
                    let parsed = parse_record(line);
                    if parsed.is_empty() {
                        skipped += 1;
                    }
                    candidates.extend(parsed);
                },
            )
            .await?;

        debug!(lines, skipped, "soundcloud records read");
        info!(tracks = candidates.len(), "soundcloud playlist enumerated");
        Ok(candidates)
    }
}
