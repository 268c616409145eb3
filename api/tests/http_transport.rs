//! Tests for the reqwest transport against a local mock server.

use faraway_admin_api::{
    ApiClient, ApiConfig, ApiError, ApiRequest, FilePart, MultipartForm, NoToken, StaticToken,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> ApiConfig {
    let mut config = ApiConfig::default();
    config.base_url = server.uri().parse().unwrap();
    config.timeout = Duration::from_secs(5);
    config
}

fn client(server: &MockServer, token: Option<&str>) -> ApiClient {
    let config = config(server);
    let transport = Arc::new(faraway_admin_api::HttpTransport::new(&config).unwrap());
    match token {
        Some(token) => ApiClient::new(transport, Arc::new(StaticToken::new(token))),
        None => ApiClient::new(transport, Arc::new(NoToken)),
    }
}

#[tokio::test]
async fn test_get_with_query_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/all-blogs"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "blogs": [], "total": 0, "totalPages": 0, "currentPage": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server, Some("secret"))
        .send(ApiRequest::get("/blog/all-blogs").query("page", 2).query("limit", 10))
        .await
        .unwrap();

    assert_eq!(body["data"]["currentPage"], 2);
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tags/all-tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    client(&server, None)
        .send(ApiRequest::get("/tags/all-tags"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_json_body_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/blog/update-status"))
        .and(query_param("id", "b1"))
        .and(body_json(json!({ "status": "published" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "_id": "b1" } })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server, Some("t"))
        .send(
            ApiRequest::patch("/blog/update-status")
                .query("id", "b1")
                .json(json!({ "status": "published" })),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_multipart_body_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/blog/add-blog"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "new" })))
        .mount(&server)
        .await;

    let form = MultipartForm::new()
        .text("title", "Sailing the Andaman")
        .text("slug", "sailing-the-andaman")
        .file("image", FilePart::new("cover.png", "image/png", vec![137, 80, 78, 71]));

    let body = client(&server, Some("t"))
        .send(ApiRequest::post("/blog/add-blog").multipart(form))
        .await
        .unwrap();
    assert_eq!(body["_id"], "new");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let raw = String::from_utf8_lossy(&requests[0].body);
    assert!(raw.contains("name=\"title\""));
    assert!(raw.contains("Sailing the Andaman"));
    assert!(raw.contains("filename=\"cover.png\""));
}

#[tokio::test]
async fn test_status_error_keeps_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/blog/delete-blog"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": { "message": "Not allowed" } })),
        )
        .mount(&server)
        .await;

    let error = client(&server, Some("t"))
        .send(ApiRequest::delete("/blog/delete-blog").query("id", "x"))
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Status { status: 403, .. }));
    assert_eq!(error.user_message("Failed to delete blog"), "Not allowed");
}

#[tokio::test]
async fn test_fallback_reaches_second_shape() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/blog/edit-blog/b7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/blog/edit-blog"))
        .and(query_param("id", "b7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "_id": "b7" } })))
        .expect(1)
        .mount(&server)
        .await;

    let body = client(&server, Some("t"))
        .send_first_ok(vec![
            ApiRequest::put("/blog/edit-blog/b7"),
            ApiRequest::put("/blog/edit-blog").query("id", "b7"),
            ApiRequest::patch("/blog/edit-blog/b7"),
        ])
        .await
        .unwrap();

    assert_eq!(body["data"]["_id"], "b7");
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let mut config = ApiConfig::default();
    config.base_url = "http://127.0.0.1:9".parse().unwrap();
    config.timeout = Duration::from_secs(2);
    let client = ApiClient::from_config(&config).unwrap();

    let error = client.send(ApiRequest::get("/blog/all-blogs")).await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
    assert!(error.allows_fallback());
}
