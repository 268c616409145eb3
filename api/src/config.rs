//! Client configuration loaded from the environment.

use crate::error::ConfigError;
use crate::token::{FileTokenStore, StaticToken, TokenStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default content API location
pub const DEFAULT_BASE_URL: &str = "https://faraway.thedevapp.online";

/// Default location of the client-side token storage
pub const DEFAULT_TOKEN_FILE: &str = ".faraway/token";

/// Settings for [`ApiClient`](crate::ApiClient)
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API base URL, without a trailing path
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Fixed bearer token; takes precedence over `token_file`
    pub token: Option<String>,
    /// File the bearer token is read from on every request
    pub token_file: PathBuf,
    /// Try alternate endpoint shapes when the canonical one fails
    pub endpoint_fallbacks: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: Duration::from_secs(30),
            token: None,
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            endpoint_fallbacks: true,
        }
    }
}

#[allow(clippy::expect_used)] // constant URL, covered by tests
fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

impl ApiConfig {
    /// Load from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    ///
    /// | variable | default |
    /// |---|---|
    /// | `FARAWAY_API_URL` | `https://faraway.thedevapp.online` |
    /// | `FARAWAY_API_TIMEOUT_SECS` | `30` |
    /// | `FARAWAY_API_TOKEN` | unset |
    /// | `FARAWAY_TOKEN_FILE` | `.faraway/token` |
    /// | `FARAWAY_API_ENDPOINT_FALLBACKS` | `true` |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = match lookup("FARAWAY_API_URL") {
            Some(value) => Url::parse(&value).map_err(|source| ConfigError::InvalidUrl {
                key: "FARAWAY_API_URL",
                value,
                source,
            })?,
            None => defaults.base_url,
        };

        let timeout = match lookup("FARAWAY_API_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidValue {
                    key: "FARAWAY_API_TIMEOUT_SECS",
                    value,
                })?,
            None => defaults.timeout,
        };

        let endpoint_fallbacks = match lookup("FARAWAY_API_ENDPOINT_FALLBACKS") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                key: "FARAWAY_API_ENDPOINT_FALLBACKS",
                value,
            })?,
            None => defaults.endpoint_fallbacks,
        };

        Ok(Self {
            base_url,
            timeout,
            token: lookup("FARAWAY_API_TOKEN").filter(|t| !t.trim().is_empty()),
            token_file: lookup("FARAWAY_TOKEN_FILE").map_or(defaults.token_file, PathBuf::from),
            endpoint_fallbacks,
        })
    }

    /// Token source described by this configuration
    #[must_use]
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token {
            Some(token) => Arc::new(StaticToken::new(token.clone())),
            None => Arc::new(FileTokenStore::new(self.token_file.clone())),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
