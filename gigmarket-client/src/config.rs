//! Client configuration.

use crate::error::ApiError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/";

/// Default refresh-exchange route, relative to the base URL.
pub const DEFAULT_REFRESH_PATH: &str = "auth/token/refresh/";

/// Default bound on a single refresh exchange.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an [`AuthClient`](crate::AuthClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root. Relative request paths are joined onto it.
    pub base_url: Url,
    /// Refresh-exchange route, relative to `base_url`.
    pub refresh_path: String,
    /// Per-request timeout for the underlying HTTP client.
    pub timeout: Option<Duration>,
    /// Upper bound on a refresh exchange. `None` waits indefinitely.
    pub refresh_timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            timeout: None,
            refresh_timeout: Some(DEFAULT_REFRESH_TIMEOUT),
            user_agent: Some(concat!("gigmarket/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl ClientConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config rooted at `base_url`.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: normalize_base(Url::parse(base_url)?),
            ..Default::default()
        })
    }

    /// Set the refresh-exchange route.
    #[must_use]
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the refresh-exchange timeout. `None` disables the bound.
    #[must_use]
    pub fn refresh_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Load from environment variables with given prefix.
    ///
    /// Looks for:
    /// - `{PREFIX}_BASE_URL`
    /// - `{PREFIX}_REFRESH_PATH`
    /// - `{PREFIX}_TIMEOUT_SECS`
    /// - `{PREFIX}_REFRESH_TIMEOUT_SECS` (`0` disables the bound)
    ///
    /// Unset variables keep their defaults.
    pub fn from_env(prefix: &str) -> Result<Self, ApiError> {
        let mut config = match std::env::var(format!("{}_BASE_URL", prefix)) {
            Ok(url) => Self::with_base_url(&url)?,
            Err(_) => Self::default(),
        };

        if let Ok(path) = std::env::var(format!("{}_REFRESH_PATH", prefix)) {
            config.refresh_path = path;
        }
        if let Some(secs) = env_secs(&format!("{}_TIMEOUT_SECS", prefix))? {
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = env_secs(&format!("{}_REFRESH_TIMEOUT_SECS", prefix))? {
            config.refresh_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Resolve a request target against the base URL.
    ///
    /// Absolute URLs pass through untouched; anything else is treated as a
    /// path below `base_url`.
    pub fn resolve(&self, target: &str) -> Result<Url, ApiError> {
        if let Ok(url) = Url::parse(target) {
            return Ok(url);
        }
        Ok(self.base_url.join(target.trim_start_matches('/'))?)
    }

    /// Absolute URL of the refresh-exchange endpoint.
    pub fn refresh_url(&self) -> Result<Url, ApiError> {
        self.resolve(&self.refresh_path)
    }

    /// Build an HTTP client with this config.
    pub fn build_http_client(&self) -> Result<Client, ApiError> {
        let mut builder = Client::builder();

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        Ok(builder.build()?)
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL")
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn env_secs(name: &str) -> Result<Option<u64>, ApiError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ApiError::Config(format!("{}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.refresh_path, DEFAULT_REFRESH_PATH);
        assert_eq!(config.refresh_timeout, Some(DEFAULT_REFRESH_TIMEOUT));
        assert!(config.timeout.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ClientConfig::with_base_url("https://api.example.com/v1")
            .unwrap()
            .refresh_path("token/refresh/")
            .timeout(Duration::from_secs(10))
            .refresh_timeout(None)
            .user_agent("tests");

        assert_eq!(config.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.refresh_path, "token/refresh/");
        assert_eq!(config.timeout, Some(Duration::from_secs(10)));
        assert_eq!(config.refresh_timeout, None);
        assert_eq!(config.user_agent.as_deref(), Some("tests"));
    }

    #[rstest]
    #[case("gigs/", "https://api.example.com/api/gigs/")]
    #[case("/gigs/my-gigs", "https://api.example.com/api/gigs/my-gigs")]
    #[case("auth/token/refresh/", "https://api.example.com/api/auth/token/refresh/")]
    #[case("https://cdn.example.com/uploads/a.png", "https://cdn.example.com/uploads/a.png")]
    fn test_resolve(#[case] target: &str, #[case] expected: &str) {
        let config = ClientConfig::with_base_url("https://api.example.com/api").unwrap();
        assert_eq!(config.resolve(target).unwrap().as_str(), expected);
    }

    #[test]
    fn test_refresh_url() {
        let config = ClientConfig::with_base_url("https://api.example.com/api/").unwrap();
        assert_eq!(
            config.refresh_url().unwrap().as_str(),
            "https://api.example.com/api/auth/token/refresh/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::with_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("GM_CFG_TEST_BASE_URL", "https://env.example.com/api");
        std::env::set_var("GM_CFG_TEST_TIMEOUT_SECS", "15");
        std::env::set_var("GM_CFG_TEST_REFRESH_TIMEOUT_SECS", "0");

        let config = ClientConfig::from_env("GM_CFG_TEST").unwrap();

        assert_eq!(config.base_url.as_str(), "https://env.example.com/api/");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.refresh_timeout, None);
        assert_eq!(config.refresh_path, DEFAULT_REFRESH_PATH);

        std::env::remove_var("GM_CFG_TEST_BASE_URL");
        std::env::remove_var("GM_CFG_TEST_TIMEOUT_SECS");
        std::env::remove_var("GM_CFG_TEST_REFRESH_TIMEOUT_SECS");
    }

    #[test]
    fn test_config_from_env_rejects_bad_number() {
        std::env::set_var("GM_CFG_BAD_TIMEOUT_SECS", "soon");
        let result = ClientConfig::from_env("GM_CFG_BAD");
        std::env::remove_var("GM_CFG_BAD_TIMEOUT_SECS");

        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_build_http_client() {
        let config = ClientConfig::new().timeout(Duration::from_secs(5));
        assert!(config.build_http_client().is_ok());
    }
}
