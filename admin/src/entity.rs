//! The contract every managed content type fulfils.
//!
//! An [`Entity`] names its wire records, its create/update payloads and the
//! endpoint shapes of its REST resource. The generic slice reducer, list view
//! and dashboard are written once against this trait.

use faraway_admin_api::{ApiRequest, MultipartForm, unwrap_data};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use std::num::NonZeroU32;

/// A CRUD verb, used to pick the loading flag and the fallback message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a record
    Add,
    /// Fetch one page of records
    GetList,
    /// Fetch a single record
    GetOne,
    /// Partially update a record
    Update,
    /// Delete a record
    Delete,
    /// Change a record's publication status
    Publish,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::GetList => "get_list",
            Self::GetOne => "get_one",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Publish => "publish",
        })
    }
}

/// Publication status of a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    /// Not visible on the public site
    #[default]
    Draft,
    /// Visible on the public site
    Published,
}

impl PublishStatus {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for PublishStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path segments of one REST resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routes {
    /// Resource prefix, e.g. `/blog`
    pub base: &'static str,
    /// Create endpoint
    pub add: &'static str,
    /// Paged list endpoint
    pub list: &'static str,
    /// Single-record endpoint
    pub by_id: &'static str,
    /// Older single-record endpoint, tried last
    pub get_alt: Option<&'static str>,
    /// Partial update endpoint
    pub edit: &'static str,
    /// Delete endpoint
    pub delete: &'static str,
    /// Status endpoint, for resources that can be published
    pub status: Option<&'static str>,
}

impl Routes {
    /// `base/segment`
    #[must_use]
    pub fn path(&self, segment: &str) -> String {
        format!("{}/{segment}", self.base)
    }

    /// `base/segment/id`
    #[must_use]
    pub fn path_with_id(&self, segment: &str, id: &str) -> String {
        format!("{}/{segment}/{id}", self.base)
    }
}

/// A content type managed through the admin API
///
/// Request builders return the canonical endpoint shape first, followed by
/// the alternates the backend has been seen to use; see
/// [`ApiClient::send_first_ok`](faraway_admin_api::ApiClient::send_first_ok).
pub trait Entity: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Record as returned by the server
    type Record: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Validated create payload
    type Draft: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;
    /// Validated partial update payload
    type Patch: Clone + fmt::Debug + PartialEq + Send + Sync + 'static;

    /// Lower-case singular, as used in messages ("blog")
    const NAME: &'static str;
    /// Lower-case plural ("blogs")
    const PLURAL: &'static str;
    /// Capitalised singular for notifications ("Blog")
    const TITLE: &'static str;
    /// Key of the record array inside a list response's `data`
    const LIST_KEY: &'static str;
    /// Endpoint layout
    const ROUTES: Routes;

    /// Server identifier (`_id`)
    fn id(record: &Self::Record) -> &str;

    /// Text the list view shows and filters on
    fn display_title(record: &Self::Record) -> &str;

    /// Multipart body for a create
    fn draft_form(draft: &Self::Draft) -> MultipartForm;

    /// Multipart body for a partial update
    fn patch_form(patch: &Self::Patch) -> MultipartForm;

    /// `POST base/add`
    fn add_request(draft: &Self::Draft) -> ApiRequest {
        ApiRequest::post(Self::ROUTES.path(Self::ROUTES.add)).multipart(Self::draft_form(draft))
    }

    /// `GET base/list?page&limit`, passed through verbatim
    fn list_request(page: NonZeroU32, limit: NonZeroU32) -> ApiRequest {
        ApiRequest::get(Self::ROUTES.path(Self::ROUTES.list))
            .query("page", page)
            .query("limit", limit)
    }

    /// `GET by_id?id=`, then `GET by_id/{id}`, then the older endpoint
    fn get_requests(id: &str) -> Vec<ApiRequest> {
        let routes = Self::ROUTES;
        let mut requests = vec![
            ApiRequest::get(routes.path(routes.by_id)).query("id", id),
            ApiRequest::get(routes.path_with_id(routes.by_id, id)),
        ];
        if let Some(alt) = routes.get_alt {
            requests.push(ApiRequest::get(routes.path_with_id(alt, id)));
        }
        requests
    }

    /// `PUT edit/{id}`, then `PUT edit?id=`, then `PATCH edit/{id}`
    fn update_requests(id: &str, patch: &Self::Patch) -> Vec<ApiRequest> {
        let routes = Self::ROUTES;
        let form = Self::patch_form(patch);
        vec![
            ApiRequest::put(routes.path_with_id(routes.edit, id)).multipart(form.clone()),
            ApiRequest::put(routes.path(routes.edit))
                .query("id", id)
                .multipart(form.clone()),
            ApiRequest::patch(routes.path_with_id(routes.edit, id)).multipart(form),
        ]
    }

    /// `DELETE delete?id=`, then `DELETE delete/{id}`
    fn delete_requests(id: &str) -> Vec<ApiRequest> {
        let routes = Self::ROUTES;
        vec![
            ApiRequest::delete(routes.path(routes.delete)).query("id", id),
            ApiRequest::delete(routes.path_with_id(routes.delete, id)),
        ]
    }

    /// `PATCH status?id=`, then `PATCH status/{id}`, then `PUT status/{id}`
    ///
    /// `None` when the resource has no status endpoint.
    fn publish_requests(id: &str, status: PublishStatus) -> Option<Vec<ApiRequest>> {
        let routes = Self::ROUTES;
        let segment = routes.status?;
        let body = json!({ "status": status });
        Some(vec![
            ApiRequest::patch(routes.path(segment))
                .query("id", id)
                .json(body.clone()),
            ApiRequest::patch(routes.path_with_id(segment, id)).json(body.clone()),
            ApiRequest::put(routes.path_with_id(segment, id)).json(body),
        ])
    }

    /// Message shown when a failed operation carries no usable text
    fn fallback_message(operation: Operation) -> String {
        match operation {
            Operation::Add => format!("Failed to add {}", Self::NAME),
            Operation::GetList => format!("Failed to get {}", Self::PLURAL),
            Operation::GetOne => format!("Failed to get {}", Self::NAME),
            Operation::Update => format!("Failed to update {}", Self::NAME),
            Operation::Delete => format!("Failed to delete {}", Self::NAME),
            Operation::Publish => format!("Failed to publish {}", Self::NAME),
        }
    }
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<R> {
    /// Records in server order
    pub records: Vec<R>,
    /// Total records across all pages
    pub total: u64,
    /// Number of pages
    pub total_pages: u32,
    /// Page this response describes
    pub current_page: u32,
}

impl<R: DeserializeOwned> ListPage<R> {
    /// Parse `{data:{<list_key>, total, totalPages, currentPage}}`
    ///
    /// The envelope is optional and the counters may arrive as numbers or
    /// numeric strings. Missing counters fall back to what the page itself
    /// shows, and a missing `currentPage` to the page that was requested.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the record array does not match `R`.
    pub fn from_body(body: Value, list_key: &str, requested: NonZeroU32) -> Result<Self, serde_json::Error> {
        let mut data = unwrap_data(body);
        let records: Vec<R> = match data.get_mut(list_key).map(Value::take) {
            Some(Value::Null) | None => Vec::new(),
            Some(list) => serde_json::from_value(list)?,
        };

        let total = lenient::u64_field(&data, "total").unwrap_or(records.len() as u64);
        let total_pages = lenient::u64_field(&data, "totalPages")
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(u32::from(total > 0));
        let current_page = lenient::u64_field(&data, "currentPage")
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .unwrap_or(requested.get());

        Ok(Self {
            records,
            total,
            total_pages,
            current_page,
        })
    }
}

/// Tolerant decoding for fields the backend sends as numbers or strings
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(crate) fn u64_field(data: &Value, key: &str) -> Option<u64> {
        match data.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// `"12"`, `12` and `12.5` all become strings; `null` becomes empty
    pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Blogs, Tags};
    use faraway_admin_api::Method;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_list_request_passes_paging_verbatim() {
        let request = Blogs::list_request(nz(3), nz(7));
        assert_eq!(request.to_string(), "GET /blog/all-blogs?page=3&limit=7");
    }

    #[test]
    fn test_get_chain_order() {
        let shapes: Vec<String> = Blogs::get_requests("b1").iter().map(ToString::to_string).collect();
        assert_eq!(
            shapes,
            vec![
                "GET /blog/blogByID?id=b1",
                "GET /blog/blogByID/b1",
                "GET /blog/get-blog/b1",
            ]
        );
        assert_eq!(Tags::get_requests("t1").len(), 2);
    }

    #[test]
    fn test_update_chain_order() {
        let methods: Vec<(Method, String)> = Tags::update_requests("t9", &Default::default())
            .into_iter()
            .map(|r| (r.method, r.to_string()))
            .collect();
        assert_eq!(methods[0], (Method::Put, "PUT /tags/edit-tag/t9".to_string()));
        assert_eq!(methods[1], (Method::Put, "PUT /tags/edit-tag?id=t9".to_string()));
        assert_eq!(methods[2], (Method::Patch, "PATCH /tags/edit-tag/t9".to_string()));
    }

    #[test]
    fn test_delete_chain_order() {
        let shapes: Vec<String> = Blogs::delete_requests("abc123").iter().map(ToString::to_string).collect();
        assert_eq!(shapes, vec!["DELETE /blog/delete-blog?id=abc123", "DELETE /blog/delete-blog/abc123"]);
    }

    #[test]
    fn test_publish_chain_has_json_status() {
        let requests = Blogs::publish_requests("b1", PublishStatus::Published).unwrap();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].to_string(), "PATCH /blog/update-status?id=b1");
        assert_eq!(requests[2].to_string(), "PUT /blog/update-status/b1");
        for request in &requests {
            assert_eq!(
                request.body,
                faraway_admin_api::RequestBody::Json(json!({ "status": "published" }))
            );
        }
        assert!(Tags::publish_requests("t1", PublishStatus::Draft).is_none());
    }

    #[test]
    fn test_fallback_messages() {
        assert_eq!(Blogs::fallback_message(Operation::Add), "Failed to add blog");
        assert_eq!(Blogs::fallback_message(Operation::GetList), "Failed to get blogs");
        assert_eq!(Tags::fallback_message(Operation::Delete), "Failed to delete tag");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
    }

    #[test]
    fn test_list_page_from_envelope() {
        let body = json!({
            "data": { "tags": [{ "name": "a" }, { "name": "b" }], "total": "12", "totalPages": 2, "currentPage": 2 }
        });
        let page = ListPage::<Row>::from_body(body, "tags", nz(2)).unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.total, 12);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 2);
    }

    #[test]
    fn test_list_page_missing_counters() {
        let body = json!({ "tags": [{ "name": "a" }] });
        let page = ListPage::<Row>::from_body(body, "tags", nz(4)).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 4);

        let empty = ListPage::<Row>::from_body(json!({ "data": {} }), "tags", nz(1)).unwrap();
        assert!(empty.records.is_empty());
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_list_page_rejects_malformed_records() {
        let body = json!({ "data": { "tags": [{ "label": 1 }] } });
        assert!(ListPage::<Row>::from_body(body, "tags", nz(1)).is_err());
    }
}
