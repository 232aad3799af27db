//! Error types for source providers.
//!
//! Provider errors never reach the caller of [`SourceProvider::resolve`]:
//! they are logged there and the provider contributes no candidates.
//!
//! [`SourceProvider::resolve`]: super::SourceProvider::resolve

use thiserror::Error;

use crate::tool::ToolError;

/// Errors raised while a provider gathers candidates.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The external media tool failed.
    #[error("media tool failed: {0}")]
    Tool(#[from] ToolError),

    /// The page or search endpoint could not be reached.
    #[error("network error fetching {url}: {source}")]
    Http {
        /// URL being fetched.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an error status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// URL being fetched.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response could not be understood.
    #[error("could not parse response for {input}: {reason}")]
    Parse {
        /// Input being processed.
        input: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// The provider's HTTP client could not be built.
    #[error(
        "{provider} provider unavailable: {reason}\n  Suggestion: check proxy environment variables and TLS setup"
    )]
    ClientBuild {
        /// Provider name.
        provider: &'static str,
        /// Builder failure description.
        reason: String,
    },
}

impl ProviderError {
    /// Creates a network error.
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
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

    /// Creates a parse error.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a client construction error.
    pub fn client_build(provider: &'static str, reason: impl Into<String>) -> Self {
        Self::ClientBuild {
            provider,
            reason: reason.into(),
        }
    }
}
