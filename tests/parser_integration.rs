//! Integration tests for the parser module.
//!
//! These tests verify tracklist cleaning and input classification with
//! realistic pasted and scraped text.

use playlistdl_core::parser::{
    DEFAULT_SETLIST_DOMAIN, InputKind, MAX_TRACK_CHARS, MIN_TRACK_CHARS, classify_input, normalize,
    strip_list_numbering,
};

/// A tracklist copied from a video description.
const DESCRIPTION: &str = r"Tracklist:
00:00 Intro
01:32 Bonobo - Kerala [Ninja Tune]
05:10 ▶ Four Tet - Baby (Original Mix)
09:45 Caribou – Can't Do Without You https://youtu.be/abc123
12:00 ok
Follow me on https://instagram.com/somebody

14:20 Jon Hopkins - Open Eye Signal";

#[test]
fn test_normalize_video_description() {
    let titles = normalize(DESCRIPTION);
    assert_eq!(
        titles,
        vec![
            "Tracklist:",
            "Intro",
            "Bonobo - Kerala",
            "Four Tet - Baby",
            "Caribou – Can't Do Without You",
            "Follow me on",
            "Jon Hopkins - Open Eye Signal",
        ]
    );
}

fn has_timestamp(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(4).any(|w| {
        w[0].is_ascii_digit() && w[1] == ':' && w[2].is_ascii_digit() && w[3].is_ascii_digit()
    })
}

#[test]
fn test_normalize_output_lines_are_clean() {
    for title in normalize(DESCRIPTION) {
        let chars = title.chars().count();
        assert!((MIN_TRACK_CHARS..=MAX_TRACK_CHARS).contains(&chars), "{title}");
        assert!(!title.contains("http"), "{title}");
        assert!(!has_timestamp(&title), "{title}");
    }
}

#[test]
fn test_normalize_is_idempotent_on_its_output() {
    let once = normalize(DESCRIPTION);
    let twice = normalize(&once.join("\n"));
    assert_eq!(once, twice);
}

#[test]
fn test_normalize_keeps_duplicates_in_order() {
    let titles = normalize("Song One\nSong Two\nSong One");
    assert_eq!(titles, vec!["Song One", "Song Two", "Song One"]);
}

#[test]
fn test_normalize_without_tracks_is_empty() {
    assert!(normalize("").is_empty());
    assert!(normalize("\n  \n[x]\nhttps://example.com\n1:23").is_empty());
}

#[test]
fn test_pasted_numbered_list() {
    let pasted = "1. Massive Attack - Teardrop\n2) Portishead - Roads\n10 Air - La Femme d'Argent";
    let stripped: Vec<&str> = pasted.lines().map(strip_list_numbering).collect();
    assert_eq!(
        normalize(&stripped.join("\n")),
        vec![
            "Massive Attack - Teardrop",
            "Portishead - Roads",
            "Air - La Femme d'Argent"
        ]
    );
}

#[test]
fn test_classify_mixed_inputs() {
    let cases = [
        (
            "https://soundcloud.com/artist/sets/summer",
            InputKind::SoundCloudUrl,
        ),
        (
            "https://www.youtube.com/playlist?list=PL123",
            InputKind::YoutubePlaylistUrl,
        ),
        (
            "https://www.youtube.com/watch?v=abc&list=PL9",
            InputKind::YoutubePlaylistUrl,
        ),
        ("https://youtu.be/abc?si=track", InputKind::YoutubeVideoUrl),
        (
            "https://www.setlist.fm/setlist/radiohead/2017/x.html",
            InputKind::SetlistUrl,
        ),
        ("http://blog.example.com/mix-42", InputKind::WebUrl),
        ("daft punk around the world", InputKind::Text),
        ("Song One\nSong Two", InputKind::Text),
    ];
    for (input, expected) in cases {
        assert_eq!(
            classify_input(input, DEFAULT_SETLIST_DOMAIN),
            expected,
            "{input}"
        );
    }
}
