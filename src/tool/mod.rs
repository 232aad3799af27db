//! External media tool integration.
//!
//! YouTube and SoundCloud enumeration and audio downloads go through
//! `yt-dlp`. [`YtDlp`] owns the process plumbing; providers and the download
//! engine build their own argument lists on top of it.

mod error;
mod ytdlp;

pub use error::ToolError;
pub use ytdlp::{DEFAULT_PROGRAM, YtDlp};
