//! Text handling for user input.
//!
//! - [`classify_input`] decides which source an input names (SoundCloud,
//!   YouTube, setlist page, other web page, or free text).
//! - [`normalize`] turns pasted or scraped text into clean track titles.
//!
//! Both are pure and never fail: unrecognized input is free text, and text
//! without anything track-like yields an empty list.

mod input;
mod tracklist;

pub use input::{DEFAULT_SETLIST_DOMAIN, InputKind, classify_input, looks_like_url};
pub use tracklist::{
    MAX_TRACK_CHARS, MIN_DESCRIPTION_TRACKS, MIN_TRACK_CHARS, attribute_to_performer, clean_line,
    dedupe_preserving_order, description_tracklist, looks_like_track, normalize,
    strip_list_numbering,
};
