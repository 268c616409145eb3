//! Bearer token sources.
//!
//! The token is looked up on every request, so a login performed by another
//! tool (which rewrites the token file) takes effect without restarting.

use std::path::PathBuf;
use std::sync::RwLock;

/// Where the bearer token comes from
pub trait TokenStore: Send + Sync {
    /// Current token, `None` when the user is not signed in
    fn token(&self) -> Option<String>;
}

/// No token at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenStore for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

/// A token fixed at startup
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenStore for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// A token that can be replaced at runtime
#[derive(Debug, Default)]
pub struct SharedToken(RwLock<Option<String>>);

impl SharedToken {
    /// Start signed out
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the token
    pub fn set(&self, token: impl Into<String>) {
        let mut slot = self.0.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(token.into());
    }

    /// Forget the token
    pub fn clear(&self) {
        let mut slot = self.0.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = None;
    }
}

impl TokenStore for SharedToken {
    fn token(&self) -> Option<String> {
        self.0
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// Token persisted in a local file, re-read on every call
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Read tokens from `path`
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            },
            Err(error) => {
                tracing::trace!(path = %self.path.display(), %error, "No stored token");
                None
            },
        }
    }
}
