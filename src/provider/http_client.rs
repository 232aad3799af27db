//! Shared HTTP client policy for page-scraping providers.
//!
//! Web, setlist and direct-file providers all fetch HTML. They share the same
//! timeout defaults and response handling; only the User-Agent differs.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::ProviderError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Timeouts applied to provider page fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// TCP/TLS connect timeout.
    pub connect: Duration,
    /// Whole-request timeout.
    pub read: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read: Duration::from_secs(READ_TIMEOUT_SECS),
        }
    }
}

/// Builds a provider HTTP client.
///
/// `provider` only labels the error when construction fails.
///
/// # Errors
///
/// Returns [`ProviderError::ClientBuild`] when the TLS backend or proxy
/// configuration cannot be initialized.
pub fn build_http_client(
    provider: &'static str,
    user_agent: impl Into<String>,
    timeouts: HttpTimeouts,
) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(timeouts.connect)
        .timeout(timeouts.read)
        .user_agent(user_agent.into())
        .gzip(true)
        .build()
        .map_err(|e| ProviderError::client_build(provider, e.to_string()))
}

/// GETs `url` and returns the body as text, treating non-2xx as an error.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] on network failure and
/// [`ProviderError::HttpStatus`] on an error status.
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String, ProviderError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ProviderError::http(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::http_status(url, status.as_u16()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::http(url, e))?;
    debug!(url, bytes = body.len(), "fetched page");
    Ok(body)
}
