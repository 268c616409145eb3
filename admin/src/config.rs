//! Dashboard configuration.
//!
//! Extends [`ApiConfig`] with the settings the list views need.

use faraway_admin_api::{ApiConfig, ConfigError};
use std::num::NonZeroU32;
use std::time::Duration;

/// Default list page size
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

/// Settings for [`AdminDashboard`](crate::AdminDashboard)
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// HTTP client settings
    pub api: ApiConfig,
    /// Records requested per list page
    pub page_size: NonZeroU32,
    /// How long the dashboard waits for an operation's result action
    ///
    /// Covers a full fallback chain, so it is a multiple of the request timeout.
    pub result_timeout: Duration,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self::with_api(ApiConfig::default(), DEFAULT_PAGE_SIZE)
    }
}

impl AdminConfig {
    /// Build from API settings and a page size
    #[must_use]
    pub fn with_api(api: ApiConfig, page_size: NonZeroU32) -> Self {
        let result_timeout = api.timeout.saturating_mul(4);
        Self {
            api,
            page_size,
            result_timeout,
        }
    }

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
    /// Reads every `FARAWAY_API_*` variable [`ApiConfig::from_lookup`] knows,
    /// plus `FARAWAY_PAGE_SIZE` (default `10`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api = ApiConfig::from_lookup(&lookup)?;

        let page_size = match lookup("FARAWAY_PAGE_SIZE") {
            Some(value) => value
                .trim()
                .parse::<NonZeroU32>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "FARAWAY_PAGE_SIZE",
                    value,
                })?,
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self::with_api(api, page_size))
    }
}
