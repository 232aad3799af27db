//! Setlist page provider.
//!
//! Setlist pages name the performer in their `og:title` meta tag and list
//! songs as `li.setlistParts-song` items, so they get a precise extractor
//! instead of the generic list-item sweep.

use std::sync::LazyLock;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use super::http_client::{HttpTimeouts, build_http_client, fetch_text};
use super::web::{PageTracks, element_text};
use super::{ProviderContext, ProviderError, ProviderKind, SourceProvider};
use crate::parser::clean_line;
use crate::track::{TrackCandidate, TrackSource};
use crate::user_agent;

#[allow(clippy::expect_used)]
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[property='og:title']").expect("og:title selector is valid")
});

#[allow(clippy::expect_used)]
static SONG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li.setlistParts-song").expect("song selector is valid"));

#[allow(clippy::expect_used)]
static SONG_LABEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.songLabel").expect("song label selector is valid"));

/// Extracts the performer and song titles from a setlist page.
///
/// The song label link is preferred over the whole item text, which also
/// carries guest and cover notes. Empty titles are dropped; order and
/// repeats (encores) are kept.
#[must_use]
pub fn extract_setlist_tracks(html: &str) -> PageTracks {
    let document = Html::parse_document(html);

    let performer = document
        .select(&OG_TITLE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| {
            content
                .split(" Setlist")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .unwrap_or_default();

    let titles = document
        .select(&SONG)
        .map(|song| {
            let text = song
                .select(&SONG_LABEL)
                .next()
                .map_or_else(|| element_text(song), element_text);
            clean_line(&text)
        })
        .filter(|title| !title.is_empty())
        .collect();

    PageTracks { performer, titles }
}

/// Scrapes setlist pages.
#[derive(Debug, Clone)]
pub struct SetlistProvider {
    client: Client,
}

impl SetlistProvider {
    /// Creates the provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ClientBuild`] when the client cannot be built.
    pub fn new(timeouts: HttpTimeouts) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_http_client("setlist", user_agent::default_user_agent(), timeouts)?,
        })
    }
}

#[async_trait]
impl SourceProvider for SetlistProvider {
    fn name(&self) -> &'static str {
        "setlist"
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Setlist
    }

    #[instrument(skip(self, _ctx))]
    async fn fetch(
        &self,
        input: &str,
        _ctx: &ProviderContext,
    ) -> Result<Vec<TrackCandidate>, ProviderError> {
        let html = fetch_text(&self.client, input.trim()).await?;
        let page = extract_setlist_tracks(&html);
        debug!(performer = %page.performer, songs = page.titles.len(), "extracted setlist");
        Ok(page.into_candidates(TrackSource::GenericWeb))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <meta property="og:title" content="Radiohead Setlist at Madison Square Garden, New York">
        </head><body><ol>
        <li class="setlistParts-song"><a class="songLabel" href="/s/1">Airbag</a>
            <span class="infoPart">(with strings)</span></li>
        <li class="setlistParts-song"><a class="songLabel" href="/s/2">Creep</a></li>
        <li class="setlistParts-song"><span>Thom Yorke - Suspirium</span></li>
        <li class="setlistParts-song"><a class="songLabel" href="/s/3"> </a></li>
        <li class="setlistParts-song"><a class="songLabel" href="/s/2">Creep</a></li>
        <li class="other">Not a song</li>
        </ol></body></html>"#;

    #[test]
    fn test_extract_setlist_tracks() {
        let page = extract_setlist_tracks(PAGE);
        assert_eq!(page.performer, "Radiohead");
        assert_eq!(
            page.titles,
            vec!["Airbag", "Creep", "Thom Yorke - Suspirium", "Creep"]
        );
    }

    #[test]
    fn test_setlist_titles_attributed_with_en_dash() {
        let candidates = extract_setlist_tracks(PAGE).into_candidates(TrackSource::GenericWeb);
        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Radiohead – Airbag",
                "Radiohead – Creep",
                "Thom Yorke - Suspirium",
                "Radiohead – Creep"
            ]
        );
    }

    #[test]
    fn test_setlist_without_meta() {
        let page = extract_setlist_tracks(
            r#"<ul><li class="setlistParts-song"><a class="songLabel">Intro</a></li></ul>"#,
        );
        assert_eq!(page.performer, "");
        assert_eq!(page.titles, vec!["Intro"]);
    }
}
