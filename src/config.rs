//! Client configuration.
//!
//! Defaults match a backend running locally. Environment variables override
//! the defaults and command-line flags override both.

use std::time::Duration;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the backend address
pub const ENV_BASE_URL: &str = "STREAMCHAT_BASE_URL";

/// Environment variable setting a whole-request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "STREAMCHAT_TIMEOUT_SECS";

/// Configuration for the HTTP side of the chat client.
///
/// Use the builder methods to customize it.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use streamchat::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://chat.internal:9000/")
///     .with_connect_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url, "http://chat.internal:9000");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend address without a trailing slash
    pub base_url: String,
    /// Upper bound for a whole request including the streamed body (default: none)
    pub request_timeout: Option<Duration>,
    /// Upper bound for establishing the connection (default: none)
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            connect_timeout: None,
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `STREAMCHAT_BASE_URL` and `STREAMCHAT_TIMEOUT_SECS`.
    ///
    /// Empty values are ignored; an unparsable timeout is ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => {
                    config = config.with_request_timeout(Duration::from_secs(secs));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Ignoring {}={:?}: {}", ENV_TIMEOUT_SECS, raw, e);
                }
            }
        }

        config
    }

    /// Set the backend address.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the whole-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Absolute URL for an endpoint path such as `/chat`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_TIMEOUT_SECS);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert!(config.request_timeout.is_none());
        assert!(config.connect_timeout.is_none());
    }

    #[test]
    fn test_builder_trims_trailing_slashes() {
        let config = ClientConfig::new().with_base_url("http://example.com:8000//");
        assert_eq!(config.base_url, "http://example.com:8000");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let config = ClientConfig::new();
        assert_eq!(config.endpoint("/chat"), "http://localhost:8000/chat");
        assert_eq!(config.endpoint("session"), "http://localhost:8000/session");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var(ENV_BASE_URL, "http://10.0.0.2:8080/");
        std::env::set_var(ENV_TIMEOUT_SECS, "90");

        let config = ClientConfig::from_env();
        assert_eq!(config.base_url, "http://10.0.0.2:8080");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(90)));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_bad_values() {
        clear_env();
        std::env::set_var(ENV_BASE_URL, "   ");
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");

        let config = ClientConfig::from_env();
        assert_eq!(config, ClientConfig::default());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_without_variables() {
        clear_env();
        assert_eq!(ClientConfig::from_env(), ClientConfig::default());
    }
}
