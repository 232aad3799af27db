//! Error types for the download module.
//!
//! Each variant carries the URL or path it failed on, so a rendered error
//! is enough to report a failed batch item.

use std::path::PathBuf;

use thiserror::Error;

use crate::tool::ToolError;

/// Errors that can occur while downloading one item.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error during download (create dir, create file, write).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The provided URL is malformed or not http(s).
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The external media downloader failed.
    #[error("media download failed for {url}: {source}")]
    Tool {
        /// The page URL handed to the tool.
        url: String,
        /// What the tool reported.
        #[source]
        source: ToolError,
    },
}

impl DownloadError {
    /// Creates a network error, or a timeout when reqwest reports one.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Wraps a media tool failure.
    pub fn tool(url: impl Into<String>, source: ToolError) -> Self {
        Self::Tool {
            url: url.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_download_error_timeout_display() {
        let error = DownloadError::timeout("https://example.com/a.mp3");
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("https://example.com/a.mp3"));
    }

    #[test]
    fn test_download_error_http_status_display() {
        let msg = DownloadError::http_status("https://example.com/a.mp3", 404).to_string();
        assert!(msg.contains("404"), "Expected '404' in: {msg}");
        assert!(msg.contains("https://example.com/a.mp3"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_download_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let msg = DownloadError::io(PathBuf::from("/tmp/a.mp3"), io_error).to_string();
        assert!(msg.contains("/tmp/a.mp3"), "Expected path in: {msg}");
    }

    #[test]
    fn test_download_error_invalid_url_display() {
        let msg = DownloadError::invalid_url("not-a-url").to_string();
        assert!(msg.contains("invalid URL"), "Expected 'invalid URL' in: {msg}");
        assert!(msg.contains("not-a-url"));
    }

    #[test]
    fn test_download_error_tool_display_includes_tool_message() {
        let source = ToolError::exit_status("yt-dlp", Some(1), "ERROR: Video unavailable");
        let msg = DownloadError::tool("https://youtu.be/x", source).to_string();
        assert!(msg.contains("https://youtu.be/x"), "Expected URL in: {msg}");
        assert!(msg.contains("media download failed"), "Expected prefix in: {msg}");
    }
}
