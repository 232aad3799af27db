//! Constants for the download module (timeouts, file naming).

/// HTTP connect timeout for direct file downloads (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// HTTP read timeout for direct file downloads (5 minutes for large files).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Name used when a URL has no usable final path segment.
pub const FALLBACK_FILENAME: &str = "download.mp3";

/// First numeric suffix tried for a name that is already taken (`song_2.mp3`).
pub const DUPLICATE_SUFFIX_START: usize = 2;
