//! In-memory stand-in for the content API.

use faraway_admin_api::{
    ApiClient, ApiError, ApiRequest, ApiResponse, Method, StaticToken, Transport,
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Token attached by [`ScriptedTransport::client`]
pub const TEST_TOKEN: &str = "test-token";

/// One scripted answer
#[derive(Debug, Clone)]
pub struct Reply {
    outcome: Result<ApiResponse, String>,
    delay: Duration,
}

impl Reply {
    /// Answer with `status` and a JSON body
    #[must_use]
    pub const fn json(status: u16, body: Value) -> Self {
        Self {
            outcome: Ok(ApiResponse::new(status, body)),
            delay: Duration::ZERO,
        }
    }

    /// 200 with a JSON body
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    /// `status` with an empty body
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::json(status, Value::Null)
    }

    /// No response at all
    #[must_use]
    pub fn transport_error(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            delay: Duration::ZERO,
        }
    }

    /// Resolve only after `delay`
    #[must_use]
    pub const fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

struct Route {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    replies: VecDeque<Reply>,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .iter()
                .all(|(k, v)| request.query_value(k) == Some(v.as_str()))
    }

    /// The last scripted reply repeats once the queue is down to one
    fn next_reply(&mut self) -> Option<Reply> {
        if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        }
    }
}

/// Transport that answers from a script and records every request
///
/// Unscripted endpoints answer `404 {"message":"Not Found"}`, so the first
/// shapes of a fallback chain fail naturally unless scripted.
///
/// # Example
///
/// ```
/// use faraway_admin_api::Method;
/// use faraway_admin_testing::{Reply, ScriptedTransport};
/// use serde_json::json;
///
/// let transport = ScriptedTransport::new();
/// transport.on(Method::Get, "/tags/all-tags", Reply::ok(json!({ "data": { "tags": [] } })));
/// ```
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Empty script
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Script a reply for `method path`, any query
    pub fn on(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.on_query(method, path, &[], reply)
    }

    /// Script a reply for `method path` when the query contains `query`
    ///
    /// Repeated calls for the same route queue replies in order.
    pub fn on_query(&self, method: Method, path: &str, query: &[(&str, &str)], reply: Reply) -> &Self {
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path && r.query == query)
        {
            route.replies.push_back(reply);
        } else {
            routes.push(Route {
                method,
                path: path.to_string(),
                query,
                replies: VecDeque::from([reply]),
            });
        }
        self
    }

    /// Every request received, in order
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Requests received for `method path`
    #[must_use]
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Client over this transport with [`TEST_TOKEN`]
    #[must_use]
    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(Arc::clone(self) as Arc<dyn Transport>, Arc::new(StaticToken::new(TEST_TOKEN)))
    }

    fn answer(&self, request: &ApiRequest) -> Reply {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .iter_mut()
            .filter(|r| r.matches(request))
            .max_by_key(|r| r.query.len())
            .and_then(Route::next_reply)
            .unwrap_or_else(|| Reply::json(404, json!({ "message": "Not Found" })))
    }
}

impl Transport for ScriptedTransport {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, ApiError>> + Send + '_>> {
        let reply = self.answer(&request);
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(request);

        Box::pin(async move {
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            reply.outcome.map_err(ApiError::Transport)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unscripted_is_not_found() {
        let transport = ScriptedTransport::new();
        let error = transport.client().send(ApiRequest::get("/nowhere")).await.unwrap_err();
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.user_message("x"), "Not Found");
    }

    #[tokio::test]
    async fn test_replies_queue_then_repeat() {
        let transport = ScriptedTransport::new();
        transport
            .on(Method::Get, "/a", Reply::ok(json!(1)))
            .on(Method::Get, "/a", Reply::ok(json!(2)));
        let client = transport.client();

        assert_eq!(client.send(ApiRequest::get("/a")).await.unwrap(), json!(1));
        assert_eq!(client.send(ApiRequest::get("/a")).await.unwrap(), json!(2));
        assert_eq!(client.send(ApiRequest::get("/a")).await.unwrap(), json!(2));
        assert_eq!(transport.requests_to(Method::Get, "/a").len(), 3);
    }

    #[tokio::test]
    async fn test_query_specific_route_wins() {
        let transport = ScriptedTransport::new();
        transport
            .on(Method::Get, "/list", Reply::ok(json!("any")))
            .on_query(Method::Get, "/list", &[("page", "2")], Reply::ok(json!("two")));
        let client = transport.client();

        let two = client.send(ApiRequest::get("/list").query("page", 2)).await.unwrap();
        let one = client.send(ApiRequest::get("/list").query("page", 1)).await.unwrap();
        assert_eq!(two, json!("two"));
        assert_eq!(one, json!("any"));
    }

    #[tokio::test]
    async fn test_requests_carry_token() {
        let transport = ScriptedTransport::new();
        let _ = transport.client().send(ApiRequest::get("/x")).await;
        assert_eq!(transport.requests()[0].bearer.as_deref(), Some(TEST_TOKEN));
    }

    #[tokio::test]
    async fn test_transport_error_reply() {
        let transport = ScriptedTransport::new();
        transport.on(Method::Delete, "/d", Reply::transport_error("connection reset"));
        let error = transport.client().send(ApiRequest::delete("/d")).await.unwrap_err();
        assert!(matches!(error, ApiError::Transport(ref m) if m == "connection reset"));
    }
}
