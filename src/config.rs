// src/config.rs

use crate::constants;
use std::time::Duration;
use url::Url;

/// Static client configuration. The base URL is optional on purpose: running
/// without a configured backend is a supported state that every client maps
/// to a network-class failure at call time, not at construction time.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: constants::USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(constants::DEFAULT_CONNECT_TIMEOUT_SECS),
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Resolves the base URL from the `INTRUCT_API_BASE_URL` environment
    /// variable. An unset, empty or unparsable value leaves it `None`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(constants::BASE_URL_ENV)
            .ok()
            .and_then(|raw| normalize_base_url(&raw));
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub fn with_base_url(raw: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(raw.as_ref()),
            ..Self::default()
        }
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match Url::parse(trimmed) {
        Ok(_) => Some(trimmed.to_string()),
        Err(err) => {
            log::warn!("ignoring unparsable base URL {trimmed:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let config = ClientConfig::with_base_url("https://api.intruct.app///");
        assert_eq!(config.base_url.as_deref(), Some("https://api.intruct.app"));
    }

    #[test]
    fn empty_and_invalid_urls_resolve_to_none() {
        assert_eq!(ClientConfig::with_base_url("").base_url, None);
        assert_eq!(ClientConfig::with_base_url("   ").base_url, None);
        assert_eq!(ClientConfig::with_base_url("not a url").base_url, None);
    }
}
