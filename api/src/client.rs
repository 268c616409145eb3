//! Content API client

use crate::config::ApiConfig;
use crate::error::{ApiError, SERVER_REPORTED_FALLBACK};
use crate::request::ApiRequest;
use crate::token::TokenStore;
use crate::transport::{ApiResponse, HttpTransport, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Content API client
///
/// Adds the bearer token to every request, turns non-2xx answers and
/// bodies carrying an `error` member into [`ApiError`]s, and walks
/// endpoint-shape fallback chains.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
    endpoint_fallbacks: bool,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint_fallbacks", &self.endpoint_fallbacks)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Client over an arbitrary transport, fallbacks enabled
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            transport,
            tokens,
            endpoint_fallbacks: true,
        }
    }

    /// HTTP client described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.token_store())
            .with_endpoint_fallbacks(config.endpoint_fallbacks))
    }

    /// Enable or disable alternate endpoint shapes
    #[must_use]
    pub const fn with_endpoint_fallbacks(mut self, enabled: bool) -> Self {
        self.endpoint_fallbacks = enabled;
        self
    }

    /// Whether alternate endpoint shapes are tried
    #[must_use]
    pub const fn endpoint_fallbacks(&self) -> bool {
        self.endpoint_fallbacks
    }

    /// Send one request and return its body
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when no response arrives
    /// - [`ApiError::Status`] for a non-2xx answer
    /// - [`ApiError::ServerReported`] for a 2xx body with an `error` member
    pub async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.dispatch(request).await?;
        check_reported_error(response.body)
    }

    /// Send the first candidate; on a transport or status failure try the
    /// next one, returning the first success.
    ///
    /// With fallbacks disabled only the first (canonical) candidate is sent.
    /// A 2xx answer that reports an error ends the chain.
    ///
    /// # Errors
    ///
    /// The error of the last candidate tried, or [`ApiError::InvalidRequest`]
    /// for an empty chain.
    pub async fn send_first_ok(&self, candidates: Vec<ApiRequest>) -> Result<Value, ApiError> {
        let limit = if self.endpoint_fallbacks { candidates.len() } else { 1 };
        let mut last_error = ApiError::InvalidRequest("no endpoint candidates".to_string());

        for (attempt, request) in candidates.into_iter().take(limit).enumerate() {
            let label = request.to_string();
            match self.dispatch(request).await {
                Ok(response) => {
                    if attempt > 0 {
                        metrics::counter!("api.fallbacks.used").increment(1);
                        tracing::debug!(endpoint = %label, attempt, "Fallback endpoint answered");
                    }
                    return check_reported_error(response.body);
                },
                Err(error) if error.allows_fallback() => {
                    tracing::warn!(endpoint = %label, %error, "Endpoint failed, trying next shape");
                    last_error = error;
                },
                Err(error) => return Err(error),
            }
        }

        Err(last_error)
    }

    async fn dispatch(&self, mut request: ApiRequest) -> Result<ApiResponse, ApiError> {
        request.bearer = self.tokens.token();
        let method = request.method.as_str();
        tracing::debug!(request = %request, authenticated = request.bearer.is_some(), "Sending API request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(error) => {
                metrics::counter!("api.requests.total", "method" => method, "outcome" => "transport_error")
                    .increment(1);
                return Err(error);
            },
        };

        if response.is_success() {
            metrics::counter!("api.requests.total", "method" => method, "outcome" => "success").increment(1);
            Ok(response)
        } else {
            metrics::counter!("api.requests.total", "method" => method, "outcome" => "status_error")
                .increment(1);
            Err(ApiError::Status {
                status: response.status,
                body: response.body,
            })
        }
    }
}

fn check_reported_error(body: Value) -> Result<Value, ApiError> {
    let reported = match body.get("error") {
        None | Some(Value::Null | Value::Bool(false)) => None,
        Some(error) => Some(
            error
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(SERVER_REPORTED_FALLBACK)
                .to_string(),
        ),
    };

    match reported {
        Some(message) => Err(ApiError::ServerReported { message, body }),
        None => Ok(body),
    }
}

/// The payload of an envelope: `body.data` when present, else `body`
#[must_use]
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if !data.is_null() => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            },
            None => Value::Object(map),
        },
        other => other,
    }
}
