//! Batch download engine.
//!
//! Streaming-site items (YouTube, SoundCloud) are fetched with the external
//! media tool; every other URL is streamed to disk over HTTP.
//!
//! # Features
//!
//! - Bounded concurrency (1-8, default 4) on the shared worker pool
//! - Cooperative stop between items
//! - Streaming HTTP downloads (30s connect, 5min read), partial files removed on error
//! - Filenames from the decoded final URL segment, duplicates get `_2`, `_3`, ...
//! - One outcome per item, in input order, plus batch statistics
//!
//! # Example
//!
//! ```no_run
//! use playlistdl_core::download::HttpClient;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new()?;
//! let file_path = client
//!     .download_to_file("https://example.com/live-set.mp3", Path::new("./music"))
//!     .await?;
//! println!("Downloaded: {}", file_path.display());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod engine;
mod error;
mod filename;
mod media;
mod outcome;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
pub use engine::{DEFAULT_CONCURRENCY, DownloadEngine, EngineError, ProgressCallback};
pub use error::DownloadError;
pub use media::MediaFetcher;
pub use outcome::{
    BatchReport, BatchStatistics, DownloadOutcome, SKIP_DOWNLOADS_DISABLED, SKIP_SOURCE_DISABLED,
    SKIP_STOPPED, SKIP_UNRESOLVED,
};
