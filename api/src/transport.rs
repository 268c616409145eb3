//! The wire: executes [`ApiRequest`]s and returns raw responses.

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::request::{ApiRequest, Method, Part, RequestBody};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

/// A raw response: status plus body parsed as JSON when possible
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; a non-JSON body is kept as a string, an empty one as null
    pub body: Value,
}

impl ApiResponse {
    /// Build a response
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 2xx status
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Something that can execute requests
///
/// [`HttpTransport`] talks to the real API; tests substitute an in-memory
/// double.
pub trait Transport: Send + Sync {
    /// Execute one request. Non-2xx statuses are returned as responses,
    /// only failures to get any response are errors.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, ApiError>> + Send + '_>>;
}

/// `reqwest`-backed transport
///
/// Keeps a cookie jar so session cookies set by the API are sent back.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for `config.base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, self.url(&request.path));

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(form) => {
                let mut multipart = reqwest::multipart::Form::new();
                for (name, part) in form.parts().iter().cloned() {
                    multipart = match part {
                        Part::Text(value) => multipart.text(name, value),
                        Part::File(file) => {
                            let part = reqwest::multipart::Part::bytes(file.bytes.to_vec())
                                .file_name(file.file_name)
                                .mime_str(&file.content_type)
                                .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                            multipart.part(name, part)
                        },
                    };
                }
                builder.multipart(multipart)
            },
        };

        Ok(builder)
    }
}

impl Transport for HttpTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, ApiError>> + Send + '_>> {
        Box::pin(async move {
            let builder = self.build(request)?;
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let text = response.text().await?;
            Ok(ApiResponse::new(status, parse_body(&text)))
        })
    }
}

/// Parse a body as JSON, keeping non-JSON text as a string
#[must_use]
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"ok\":true}"), json!({ "ok": true }));
        assert_eq!(parse_body("Not Found"), json!("Not Found"));
    }

    #[test]
    fn test_url_join() {
        let mut config = ApiConfig::default();
        config.base_url = url::Url::parse("http://localhost:4000/api/").unwrap();
        let transport = HttpTransport::new(&config).unwrap();

        assert_eq!(transport.url("/blog/all-blogs"), "http://localhost:4000/api/blog/all-blogs");
        assert_eq!(transport.url("tags/all-tags"), "http://localhost:4000/api/tags/all-tags");
    }

    #[test]
    fn test_response_success_range() {
        assert!(ApiResponse::new(204, Value::Null).is_success());
        assert!(!ApiResponse::new(302, Value::Null).is_success());
        assert!(!ApiResponse::new(500, Value::Null).is_success());
    }
}
