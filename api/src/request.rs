//! Transport-independent request descriptions.
//!
//! Requests are plain values so they can be cloned for each endpoint shape
//! in a fallback chain and recorded by test transports.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An uploaded file
#[derive(Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Name reported to the server
    pub file_name: String,
    /// MIME type, e.g. `image/png`
    pub content_type: String,
    /// File contents, shared between clones of a request
    pub bytes: Arc<[u8]>,
}

impl FilePart {
    /// Describe an upload
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for FilePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilePart")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One field of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Plain text value
    Text(String),
    /// File upload
    File(FilePart),
}

/// A multipart/form-data body, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<(String, Part)>,
}

impl MultipartForm {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field
    #[must_use]
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), Part::Text(value.into())));
        self
    }

    /// Append a text field only when it has a non-blank value
    #[must_use]
    pub fn text_if_present(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(value) if !value.trim().is_empty() => self.text(name, value),
            _ => self,
        }
    }

    /// Append a file field
    #[must_use]
    pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
        self.parts.push((name.into(), Part::File(file)));
        self
    }

    /// Append a file field when present
    #[must_use]
    pub fn file_if_present(self, name: impl Into<String>, file: Option<FilePart>) -> Self {
        match file {
            Some(file) => self.file(name, file),
            None => self,
        }
    }

    /// All fields in order
    #[must_use]
    pub fn parts(&self) -> &[(String, Part)] {
        &self.parts
    }

    /// First text value for `name`
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, part)| match part {
            Part::Text(value) if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// First file for `name`
    #[must_use]
    pub fn file_value(&self, name: &str) -> Option<&FilePart> {
        self.parts.iter().find_map(|(n, part)| match part {
            Part::File(file) if n == name => Some(file),
            _ => None,
        })
    }

    /// Whether a field named `name` exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }
}

/// Request body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// `application/json`
    Json(Value),
    /// `multipart/form-data`
    Multipart(MultipartForm),
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb
    pub method: Method,
    /// Path starting with `/`
    pub path: String,
    /// Query parameters in order
    pub query: Vec<(String, String)>,
    /// Body
    pub body: RequestBody,
    /// Bearer token, filled in by the client just before sending
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Request with no query or body
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    /// GET `path`
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST `path`
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PUT `path`
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// PATCH `path`
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// DELETE `path`
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Send a JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Send a multipart body
    #[must_use]
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Value of query parameter `key`
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}
