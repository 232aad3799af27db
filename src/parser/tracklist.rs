//! Tracklist cleaning: pasted or scraped text to canonical track titles.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

/// Shortest line that still looks like a track title (in characters).
pub const MIN_TRACK_CHARS: usize = 3;

/// Longest line that still looks like a track title (in characters).
pub const MAX_TRACK_CHARS: usize = 100;

/// Fewest titles a description must yield before it counts as a tracklist.
pub const MIN_DESCRIPTION_TRACKS: usize = 2;

/// Separator characters trimmed from both ends of a cleaned line.
const EDGE_SEPARATORS: &[char] = &[' ', '-', '–', '—', '•', '\t'];

#[allow(clippy::expect_used)]
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("bracket regex is valid"));

#[allow(clippy::expect_used)]
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("parenthesis regex is valid"));

#[allow(clippy::expect_used)]
static TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("timestamp regex is valid"));

#[allow(clippy::expect_used)]
static EMBEDDED_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S*").expect("embedded URL regex is valid"));

#[allow(clippy::expect_used)]
static GLYPHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[▶►•◆●]").expect("glyph regex is valid"));

#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

// Matches "1)", "12.", "3 " at the start of a pasted list line.
#[allow(clippy::expect_used)]
static LIST_NUMBERING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d{1,3}(?:[\).]\s*|\s+)").expect("list numbering regex is valid")
});

fn clean_once(line: &str) -> String {
    let line = BRACKETED.replace_all(line, " ");
    let line = PARENTHESIZED.replace_all(&line, " ");
    let line = TIMESTAMP.replace_all(&line, " ");
    let line = EMBEDDED_URL.replace_all(&line, " ");
    let line = GLYPHS.replace_all(&line, " ");
    let line = WHITESPACE_RUN.replace_all(&line, " ");
    line.trim_matches(EDGE_SEPARATORS).to_string()
}

/// Cleans a single line of tracklist text.
///
/// Removes bracketed and parenthesized annotations, `M:SS` timestamps,
/// embedded links and decorative glyphs, then collapses whitespace and trims
/// separators from both ends. Cleaning repeats until the text stops changing,
/// so a removal can never expose another removable fragment.
#[must_use]
pub fn clean_line(line: &str) -> String {
    let mut current = clean_once(line);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Returns true when a cleaned line has a plausible title length.
#[must_use]
pub fn looks_like_track(line: &str) -> bool {
    let chars = line.chars().count();
    (MIN_TRACK_CHARS..=MAX_TRACK_CHARS).contains(&chars)
}

/// Turns raw multi-line text into an ordered list of track titles.
///
/// Lines that are empty after cleaning, or fall outside the accepted length,
/// are dropped. Order is preserved and duplicates are kept. An empty result
/// means no tracks were detected.
///
/// # Example
///
/// ```
/// use playlistdl_core::parser::normalize;
///
/// let titles = normalize("Artist - Song One\nSong Two\n12:34 [Official Video] https://x.com");
/// assert_eq!(titles, vec!["Artist - Song One", "Song Two"]);
/// ```
#[tracing::instrument(skip(raw), fields(input_len = raw.len()))]
#[must_use]
pub fn normalize(raw: &str) -> Vec<String> {
    let mut titles = Vec::new();
    let mut dropped = 0usize;

    for line in raw.lines() {
        let cleaned = clean_line(line);
        if looks_like_track(&cleaned) {
            trace!(title = %cleaned, "accepted tracklist line");
            titles.push(cleaned);
        } else if !line.trim().is_empty() {
            dropped += 1;
        }
    }

    debug!(accepted = titles.len(), dropped, "normalized tracklist");
    titles
}

/// Removes exact duplicates, keeping the first occurrence of each line.
#[must_use]
pub fn dedupe_preserving_order<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for line in lines {
        let line = line.into();
        if seen.insert(line.clone()) {
            unique.push(line);
        }
    }
    unique
}

/// Strips a leading list enumerator such as `1)`, `12.` or `3 `.
#[must_use]
pub fn strip_list_numbering(line: &str) -> &str {
    match LIST_NUMBERING.find(line) {
        Some(found) => &line[found.end()..],
        None => line,
    }
}

/// Prefixes a bare song title with its performer.
///
/// Titles that already carry an `Artist - Title` separator are returned
/// unchanged. A blank performer leaves the title as it is.
#[must_use]
pub fn attribute_to_performer(performer: &str, title: &str) -> String {
    let performer = performer.trim();
    if performer.is_empty() || title.contains(" - ") || title.contains(" – ") {
        return title.to_string();
    }
    format!("{performer} – {title}")
}

/// Reads a tracklist out of a video or upload description.
///
/// Only lines carrying a timestamp or an `Artist - Title` separator are
/// considered, so promotional prose around the list is ignored. The kept
/// lines lose any list numbering, then are normalized, deduplicated and
/// attributed to `performer`.
/// Returns an empty list when fewer than [`MIN_DESCRIPTION_TRACKS`] titles
/// remain.
#[must_use]
pub fn description_tracklist(description: &str, performer: &str) -> Vec<String> {
    let marked: Vec<&str> = description
        .lines()
        .filter(|line| TIMESTAMP.is_match(line) || line.contains(" - ") || line.contains(" – "))
        .map(strip_list_numbering)
        .collect();
    let titles = dedupe_preserving_order(normalize(&marked.join("\n")));
    if titles.len() < MIN_DESCRIPTION_TRACKS {
        debug!(found = titles.len(), "description carries no tracklist");
        return Vec::new();
    }
    titles
        .iter()
        .map(|title| attribute_to_performer(performer, title))
        .collect()
}
