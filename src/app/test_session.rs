//! Offline session fixture for binary tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use playlistdl_core::resolver::SearchHit;
use playlistdl_core::{
    Dispatcher, DownloadError, HttpClient, MediaFetcher, ProviderContext, ProviderError,
    ProviderKind, ProviderSet, Session, Settings, SourceProvider, TrackCandidate, TrackSearch,
    TrackSource,
};

/// Turns every query into one YouTube candidate; queries containing
/// "broken" get a URL the fake fetcher rejects.
struct EchoYoutube;

#[async_trait]
impl SourceProvider for EchoYoutube {
    fn name(&self) -> &'static str {
        "echo-youtube"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Youtube
    }

    async fn fetch(
        &self,
        input: &str,
        _ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        let slug = input.replace(' ', "-").to_lowercase();
        let url = if input.contains("broken") {
            format!("https://youtu.be/{slug}/bad")
        } else {
            format!("https://youtu.be/{slug}")
        };
        Ok(vec![TrackCandidate::new(input, url, TrackSource::Youtube)])
    }
}

/// Knows exactly one title: "Song A".
struct OneTitleSearch;

#[async_trait]
impl TrackSearch for OneTitleSearch {
    async fn search(&self, query: &str, _limit: usize) -> Result<Vec<SearchHit>, ProviderError> {
        let table: HashMap<&str, &str> = HashMap::from([("Song A", "https://youtu.be/song-a")]);
        Ok(table
            .get(query)
            .map(|url| vec![SearchHit::new(query, *url)])
            .unwrap_or_default())
    }
}

struct FakeMedia;

#[async_trait]
impl MediaFetcher for FakeMedia {
    async fn fetch_audio(&self, url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        if url.ends_with("bad") {
            return Err(DownloadError::invalid_url(url));
        }
        Ok(dir.join(format!("{}.m4a", url.rsplit('/').next().unwrap_or("track"))))
    }
}

/// Session downloading into `dir` with offline YouTube, search and fetcher.
pub(crate) fn test_session(dir: &Path) -> Session {
    let mut providers = ProviderSet::new();
    providers.register(Arc::new(EchoYoutube));
    let settings = Settings {
        download_dir: dir.to_path_buf(),
        enable_duckduckgo: false,
        max_threads: 2,
        ..Settings::default()
    };
    Session::new(
        settings,
        Dispatcher::new(providers),
        Arc::new(OneTitleSearch),
        HttpClient::new().unwrap(),
        Arc::new(FakeMedia),
    )
}
