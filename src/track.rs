//! Track candidates: the unit that flows from providers into the queue.

use std::fmt;

/// Where a candidate was discovered, which also decides how it is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    /// YouTube search hit, playlist entry, or single video.
    Youtube,
    /// SoundCloud playlist entry.
    SoundCloud,
    /// Text scraped from a web page (generic or setlist).
    GenericWeb,
    /// Direct link to an audio file.
    DirectFile,
    /// Pasted text with no known origin.
    Unknown,
}

impl TrackSource {
    /// Returns the stable lowercase label used in logs and listings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::SoundCloud => "soundcloud",
            Self::GenericWeb => "generic_web",
            Self::DirectFile => "direct_file",
            Self::Unknown => "unknown",
        }
    }

    /// True when the candidate is fetched through the external media tool
    /// rather than a plain HTTP stream.
    #[must_use]
    pub fn uses_media_tool(self) -> bool {
        matches!(self, Self::Youtube | Self::SoundCloud)
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discovered, not-yet-downloaded track reference.
///
/// A candidate without a `url` is title-only: it must be resolved before the
/// download engine will attempt it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackCandidate {
    /// Display title, non-empty.
    pub title: String,
    /// Playable or downloadable location, if known.
    pub url: Option<String>,
    /// Discovery source.
    pub source: TrackSource,
}

impl TrackCandidate {
    /// Creates a candidate with a known location.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: TrackSource) -> Self {
        Self {
            title: title.into(),
            url: Some(url.into()),
            source,
        }
    }

    /// Creates a title-only candidate.
    #[must_use]
    pub fn title_only(title: impl Into<String>, source: TrackSource) -> Self {
        Self {
            title: title.into(),
            url: None,
            source,
        }
    }

    /// Returns true when a location is attached.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// Returns true when the title has visible content.
    #[must_use]
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

impl fmt::Display for TrackCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "{} ({})", self.title, self.source)
        } else {
            write!(f, "{} ({}, unresolved)", self.title, self.source)
        }
    }
}
