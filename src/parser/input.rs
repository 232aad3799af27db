//! Input classification: decides which kind of source a user input names.

use std::fmt;

use url::Url;

/// Default domain treated as a setlist page.
pub const DEFAULT_SETLIST_DOMAIN: &str = "setlist.fm";

/// Kind of input detected, in routing precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A `soundcloud.com` link.
    SoundCloudUrl,
    /// A YouTube playlist (`/playlist` path or a `list=` parameter).
    YoutubePlaylistUrl,
    /// A single YouTube video (`youtube.com` or `youtu.be`).
    YoutubeVideoUrl,
    /// A page on the configured setlist domain.
    SetlistUrl,
    /// Any other HTTP(S) link.
    WebUrl,
    /// Free text: a search phrase or a pasted tracklist.
    Text,
}

impl InputKind {
    /// Returns true for every URL kind.
    #[must_use]
    pub fn is_url(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SoundCloudUrl => write!(f, "SoundCloud URL"),
            Self::YoutubePlaylistUrl => write!(f, "YouTube playlist"),
            Self::YoutubeVideoUrl => write!(f, "YouTube video"),
            Self::SetlistUrl => write!(f, "setlist page"),
            Self::WebUrl => write!(f, "web page"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Returns true when `input` starts with an HTTP(S) scheme.
#[must_use]
pub fn looks_like_url(input: &str) -> bool {
    let trimmed = input.trim_start();
    let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Classifies an input string. The first matching rule wins:
/// SoundCloud, YouTube, setlist domain, other URL, then free text.
///
/// Hosts are matched on the parsed URL; links that fail to parse fall back
/// to substring checks so a slightly mangled paste still routes sensibly.
#[must_use]
pub fn classify_input(input: &str, setlist_domain: &str) -> InputKind {
    let trimmed = input.trim();
    if !looks_like_url(trimmed) || trimmed.contains('\n') {
        return InputKind::Text;
    }

    let setlist_domain = setlist_domain.trim().to_ascii_lowercase();

    let Ok(parsed) = Url::parse(trimmed) else {
        let lower = trimmed.to_ascii_lowercase();
        return if lower.contains("soundcloud.com") {
            InputKind::SoundCloudUrl
        } else if lower.contains("youtube.com") || lower.contains("youtu.be") {
            if lower.contains("list=") || lower.contains("/playlist") {
                InputKind::YoutubePlaylistUrl
            } else {
                InputKind::YoutubeVideoUrl
            }
        } else if !setlist_domain.is_empty() && lower.contains(&setlist_domain) {
            InputKind::SetlistUrl
        } else {
            InputKind::WebUrl
        };
    };

    let host = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

    if host_matches(&host, "soundcloud.com") {
        return InputKind::SoundCloudUrl;
    }

    if host_matches(&host, "youtube.com") || host_matches(&host, "youtu.be") {
        let is_playlist = parsed.path().starts_with("/playlist")
            || parsed.query_pairs().any(|(key, _)| key == "list");
        return if is_playlist {
            InputKind::YoutubePlaylistUrl
        } else {
            InputKind::YoutubeVideoUrl
        };
    }

    if !setlist_domain.is_empty() && host_matches(&host, &setlist_domain) {
        return InputKind::SetlistUrl;
    }

    InputKind::WebUrl
}
