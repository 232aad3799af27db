//! Playlist Downloader Core Library
//!
//! This library turns links and pasted text into a queue of music tracks and
//! downloads them as audio files.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Tracklist normalization and input classification
//! - [`provider`] - Source providers (YouTube, SoundCloud, web pages, setlists, file search)
//! - [`resolver`] - Input routing and fuzzy title-to-URL resolution
//! - [`queue`] - In-memory queue and selection expressions
//! - [`download`] - Batch download engine with streaming HTTP and the media tool
//! - [`pool`] - Bounded worker pool and cooperative stop flag
//! - [`tool`] - yt-dlp process wrapper
//! - [`session`] - Settings, queue and services owned by one control loop
//! - [`config`] - Runtime settings

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod download;
pub mod parser;
pub mod pool;
pub mod provider;
pub mod queue;
pub mod resolver;
pub mod session;
#[cfg(test)]
pub mod test_support;
pub mod tool;
pub mod track;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use config::Settings;
pub use download::{
    BatchReport, BatchStatistics, DEFAULT_CONCURRENCY, DownloadEngine, DownloadError,
    DownloadOutcome, EngineError, HttpClient, MediaFetcher,
};
pub use parser::{InputKind, classify_input, normalize};
pub use pool::{StopFlag, WorkerPool};
pub use provider::{ProviderContext, ProviderError, ProviderKind, ProviderSet, SourceProvider};
pub use queue::{Queue, Selection};
pub use resolver::{Dispatcher, TitleResolution, TitleResolver, TrackSearch};
pub use session::{ListIngest, Session};
pub use tool::{ToolError, YtDlp};
pub use track::{TrackCandidate, TrackSource};
