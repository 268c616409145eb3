//! # Faraway Content API Client
//!
//! HTTP client adapter for the Faraway content REST API.
//!
//! - Every request carries `Authorization: Bearer <token>` when a token is
//!   stored; the token is re-read per request.
//! - Non-2xx answers and 2xx bodies carrying an `error` member become
//!   [`ApiError`]s whose [`user_message`](ApiError::user_message) follows a
//!   fixed precedence (nested `error.message`, `message`, generic
//!   description, caller fallback).
//! - [`ApiClient::send_first_ok`] walks a chain of alternate endpoint shapes
//!   for backends that are inconsistent about where an id goes.
//!
//! ## Example
//!
//! ```no_run
//! use faraway_admin_api::{ApiClient, ApiConfig, ApiRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::from_config(&ApiConfig::from_env()?)?;
//! let body = client
//!     .send(ApiRequest::get("/blog/all-blogs").query("page", 1).query("limit", 10))
//!     .await?;
//! println!("{body}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod token;
pub mod transport;

// Re-export main types for convenience
pub use client::{ApiClient, unwrap_data};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError};
pub use request::{ApiRequest, FilePart, Method, MultipartForm, Part, RequestBody};
pub use token::{FileTokenStore, NoToken, SharedToken, StaticToken, TokenStore};
pub use transport::{ApiResponse, HttpTransport, Transport};
