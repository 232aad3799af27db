//! Downloads through the external media tool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::DownloadError;
use crate::tool::YtDlp;

/// Fetches the audio of a streaming-site page into a directory.
///
/// Implemented for [`YtDlp`]; tests substitute an in-process fake.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Downloads the best audio for `url` into `dir`, returning the file written.
    async fn fetch_audio(&self, url: &str, dir: &Path) -> Result<PathBuf, DownloadError>;
}

#[async_trait]
impl MediaFetcher for YtDlp {
    async fn fetch_audio(&self, url: &str, dir: &Path) -> Result<PathBuf, DownloadError> {
        self.download_audio(url, dir)
            .await
            .map_err(|e| DownloadError::tool(url, e))
    }
}
