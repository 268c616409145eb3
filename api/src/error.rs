//! Error types for the content API client

use serde_json::{Value, json};
use thiserror::Error;

/// Message shown when the server flags a failure without describing it.
pub const SERVER_REPORTED_FALLBACK: &str = "Something went wrong";

/// Errors that can occur when talking to the content API
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, `Value::Null` when empty
        body: Value,
    },

    /// The server answered 2xx but the body carries an `error` member
    #[error("{message}")]
    ServerReported {
        /// `error.message` from the body, or a generic fallback
        message: String,
        /// Full response body
        body: Value,
    },

    /// The response body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether the next endpoint shape should be tried after this error.
    ///
    /// Only failures to reach a working endpoint qualify; an answer the
    /// server deliberately marked as an error is final.
    #[must_use]
    pub const fn allows_fallback(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// HTTP status, if the server answered
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, if the server answered
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } | Self::ServerReported { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Best-effort human readable message.
    ///
    /// Precedence: the body's nested `error.message`, then the body's
    /// `message`, then this error's own description. Blank strings are
    /// skipped.
    #[must_use]
    pub fn extract_message(&self) -> Option<String> {
        let from_body = self.body().and_then(|body| {
            non_blank(body.pointer("/error/message")).or_else(|| non_blank(body.get("message")))
        });

        from_body.or_else(|| {
            let own = self.to_string();
            let own = match self {
                Self::Transport(detail) if detail.trim().is_empty() => String::new(),
                _ => own,
            };
            (!own.trim().is_empty()).then_some(own)
        })
    }

    /// Message for the user, falling back to an operation-specific string
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.extract_message().unwrap_or_else(|| fallback.to_string())
    }

    /// The error in the `{error:{message}}` shape every failure is reported in
    #[must_use]
    pub fn normalized(&self, fallback: &str) -> Value {
        json!({ "error": { "message": self.user_message(fallback) } })
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Errors raised while reading client configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A URL setting did not parse
    #[error("Invalid URL in {key}: {value}")]
    InvalidUrl {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// A setting had a value of the wrong shape
    #[error("Invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Offending value
        value: String,
    },
}
