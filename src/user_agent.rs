//! Shared User-Agent strings for outgoing HTTP traffic.
//!
//! Page fetches and file downloads identify the tool by name and version.
//! The direct-file search endpoint serves an empty page to unknown agents, so
//! it gets a browser-like string instead.

/// Browser-like User-Agent for the HTML search endpoint.
pub(crate) const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Default User-Agent for page fetches and file downloads.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("playlistdl/{version}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent_carries_version() {
        let ua = default_user_agent();
        assert_eq!(
            ua.strip_prefix("playlistdl/").unwrap(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_browser_user_agent_is_browser_like() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
    }
}
