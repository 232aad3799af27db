//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Find music from links or text and download it as audio files.
///
/// Inputs may be YouTube or SoundCloud links, web pages with tracklists,
/// setlist pages, or free text to search for. Without inputs and with
/// stdin attached to a terminal, `--interactive` starts a prompt session.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "playlistdl")]
#[command(author, version, about)]
pub struct Args {
    /// URLs or search text (read from stdin when omitted)
    pub inputs: Vec<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Start the interactive prompt session
    #[arg(short, long)]
    pub interactive: bool,

    /// Directory downloads are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent downloads (1-8)
    #[arg(short = 't', long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub threads: Option<u8>,

    /// Maximum concurrent title searches (1-8)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub resolve_threads: Option<u8>,

    /// Results requested per search (1-50)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=50))]
    pub max_results: Option<u8>,

    /// Search hits scored per title when resolving (1-50)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=50))]
    pub search_depth: Option<u8>,

    /// Domain whose pages are read as setlists
    #[arg(long, value_name = "DOMAIN")]
    pub setlist_domain: Option<String>,

    /// Do not search or download from YouTube
    #[arg(long)]
    pub no_youtube: bool,

    /// Do not read or download from SoundCloud
    #[arg(long)]
    pub no_soundcloud: bool,

    /// Do not search DuckDuckGo for direct files
    #[arg(long)]
    pub no_duckduckgo: bool,

    /// Do not download direct file links
    #[arg(long)]
    pub no_direct_file: bool,

    /// Look up URLs for title-only items before downloading
    #[arg(long)]
    pub resolve: bool,

    /// Download only these queue positions (e.g. "1,3-5")
    #[arg(short, long, value_name = "EXPR")]
    pub select: Option<String>,

    /// Print the queue without downloading
    #[arg(short = 'l', long)]
    pub list_only: bool,

    /// Path to the yt-dlp executable
    #[arg(long, value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,

    /// Read settings from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}
