//! Unit tests for `EntityReducer`.
//!
//! Commands are checked with `ReducerTest`; their effects are executed with
//! `run_effects` against a `ScriptedTransport` and the results reduced back
//! into state by hand.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use super::*;
use crate::entities::{Blog, Blogs, Tags};
use crate::entity::{Entity, Operation, PublishStatus};
use faraway_admin_api::{Method, RequestBody};
use faraway_admin_core::environment::Clock;
use faraway_admin_core::reducer::Reducer;
use faraway_admin_testing::{
    ReducerTest, Reply, ScriptedTransport, assertions, run_effects, test_clock,
};
use serde_json::{Value, json};
use std::num::NonZeroU32;
use std::sync::Arc;

fn env(transport: &Arc<ScriptedTransport>) -> AdminEnvironment {
    AdminEnvironment::new(transport.client(), Arc::new(test_clock()))
}

fn nz(n: u32) -> NonZeroU32 {
    NonZeroU32::new(n).unwrap()
}

fn blog_json(id: &str, title: &str, status: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "slug": title.to_lowercase().replace(' ', "-"),
        "shortDescription": "A short description",
        "detailDescription": "A long enough body for the post",
        "image": format!("https://cdn.example.com/{id}.png"),
        "status": status
    })
}

fn blog(id: &str, title: &str, status: &str) -> Blog {
    serde_json::from_value(blog_json(id, title, status)).unwrap()
}

fn blog_draft() -> crate::entities::BlogDraft {
    crate::entities::BlogDraft {
        title: "Island hopping".to_string(),
        slug: "island-hopping".to_string(),
        short_description: "Five islands in five days".to_string(),
        detail_description: "x".repeat(60),
        image: faraway_admin_api::FilePart::new("cover.png", "image/png", vec![1, 2, 3]),
        status: PublishStatus::Draft,
    }
}

/// Reduce `action`, run its effects and reduce every result
async fn drive<E: Entity>(
    state: &mut EntityState<E>,
    action: EntityAction<E>,
    env: &AdminEnvironment,
) -> Vec<EntityAction<E>> {
    let reducer = EntityReducer::<E>::new();
    let effects = reducer.reduce(state, action, env);
    let results = run_effects(effects).await;
    for result in results.clone() {
        let effects = reducer.reduce(state, result, env);
        assert!(effects.is_empty(), "results must not start new work");
    }
    results
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_command_sets_flag_and_clears_error() {
    let transport = ScriptedTransport::new();
    let mut given = EntityState::<Blogs>::default();
    given.error = Some("previous failure".to_string());

    ReducerTest::new(EntityReducer::<Blogs>::new())
        .with_env(env(&transport))
        .given_state(given)
        .when_action(EntityAction::add(blog_draft()))
        .then_state(|state| {
            assert!(state.flags.add);
            assert!(!state.flags.update);
            assert!(state.error.is_none());
        })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_future_effect(effects);
        })
        .run();
}

#[test]
fn test_clear_error_and_clear_current() {
    let transport = ScriptedTransport::new();
    let mut given = EntityState::<Blogs>::default();
    given.error = Some("boom".to_string());
    given.current = Some(blog("b1", "Kept", "draft"));

    ReducerTest::new(EntityReducer::<Blogs>::new())
        .with_env(env(&transport))
        .given_state(given)
        .when_action(EntityAction::ClearError)
        .when_action(EntityAction::ClearCurrent)
        .then_state(|state| {
            assert!(state.error.is_none());
            assert!(state.current.is_none());
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

// ============================================================================
// Results
// ============================================================================

#[tokio::test]
async fn test_add_success_caches_server_record() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Post,
        "/blog/add-blog",
        Reply::json(201, json!({ "data": blog_json("new1", "Island hopping", "draft") })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();

    drive(&mut state, EntityAction::add(blog_draft()), &env).await;

    assert!(!state.flags.add);
    assert_eq!(state.current.as_ref().map(|b| b.id.as_str()), Some("new1"));
    assert!(state.error.is_none());

    let sent = transport.requests_to(Method::Post, "/blog/add-blog");
    assert_eq!(sent.len(), 1);
    let RequestBody::Multipart(form) = &sent[0].body else {
        panic!("create must be multipart");
    };
    assert_eq!(form.text_value("status"), Some("draft"));
    assert!(form.file_value("image").is_some());
}

#[tokio::test]
async fn test_add_without_record_still_succeeds() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Post, "/blog/add-blog", Reply::ok(json!({ "message": "Created" })));
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    state.current = Some(blog("old", "Previous", "draft"));

    let add = EntityAction::add(blog_draft());
    let request = add.request().unwrap();
    let results = drive(&mut state, add, &env).await;

    assert_eq!(results, vec![EntityAction::Added { request, record: None }]);
    assert!(!state.flags.add);
    assert_eq!(state.current.as_ref().map(|b| b.id.as_str()), Some("old"));
}

#[tokio::test]
async fn test_get_list_overwrites_wholesale() {
    let transport = ScriptedTransport::new();
    transport.on_query(
        Method::Get,
        "/blog/all-blogs",
        &[("page", "2"), ("limit", "5")],
        Reply::ok(json!({
            "data": {
                "blogs": [blog_json("b6", "Sixth", "draft"), blog_json("b7", "Seventh", "published")],
                "total": 7,
                "totalPages": 2,
                "currentPage": 2
            }
        })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    state.list.records = vec![blog("stale", "Stale", "draft")];

    drive(&mut state, EntityAction::get_list(nz(2), nz(5)), &env).await;

    assert!(!state.flags.get_list);
    let ids: Vec<&str> = state.list.records.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b6", "b7"]);
    assert_eq!(state.list.total, 7);
    assert_eq!(state.list.total_pages, 2);
    assert_eq!(state.list.current_page, 2);
    assert_eq!(state.last_synced, Some(test_clock().now()));
}

#[tokio::test]
async fn test_get_list_is_idempotent() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Get,
        "/tags/all-tags",
        Reply::ok(json!({
            "data": { "tags": [{ "_id": "t1", "name": "Diving", "slug": "diving" }], "total": 1, "totalPages": 1, "currentPage": 1 }
        })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Tags>::default();

    drive(&mut state, EntityAction::get_list(nz(1), nz(10)), &env).await;
    let first = state.clone();
    drive(&mut state, EntityAction::get_list(nz(1), nz(10)), &env).await;

    assert_eq!(state, first);
}

#[tokio::test]
async fn test_failed_message_precedence() {
    let cases = [
        (
            Reply::json(400, json!({ "error": { "message": "Slug already exists" }, "message": "Bad Request" })),
            "Slug already exists",
        ),
        (Reply::json(400, json!({ "message": "Title too short" })), "Title too short"),
        (Reply::status(500), "Request failed with status code 500"),
        (Reply::transport_error("connection reset"), "Request failed: connection reset"),
        (Reply::transport_error(""), "Failed to add blog"),
    ];

    for (reply, expected) in cases {
        let transport = ScriptedTransport::new();
        transport.on(Method::Post, "/blog/add-blog", reply);
        let env = env(&transport);
        let mut state = EntityState::<Blogs>::default();

        drive(&mut state, EntityAction::add(blog_draft()), &env).await;

        assert!(!state.flags.add);
        assert_eq!(state.error.as_deref(), Some(expected));
    }
}

#[tokio::test]
async fn test_failure_leaves_cache_untouched() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/blog/all-blogs", Reply::status(503));
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    state.list.records = vec![blog("b1", "Kept", "draft")];
    state.list.total = 1;
    state.current = Some(blog("b1", "Kept", "draft"));
    let before = state.clone();

    drive(&mut state, EntityAction::get_list(nz(1), nz(10)), &env).await;

    assert_eq!(state.list, before.list);
    assert_eq!(state.current, before.current);
    assert!(!state.flags.get_list);
    assert!(state.error.is_some());
}

#[tokio::test]
async fn test_get_by_id_walks_fallbacks() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/blog/get-blog/b9", Reply::ok(blog_json("b9", "Third shape", "draft")));
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();

    drive(&mut state, EntityAction::get_by_id("b9"), &env).await;

    assert_eq!(state.current.as_ref().map(|b| b.title.as_str()), Some("Third shape"));
    assert_eq!(transport.requests().len(), 3);
}

#[tokio::test]
async fn test_get_by_id_without_fallbacks_sends_canonical_only() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Get, "/blog/get-blog/b9", Reply::ok(blog_json("b9", "Unreached", "draft")));
    let env = AdminEnvironment::new(
        transport.client().with_endpoint_fallbacks(false),
        Arc::new(test_clock()),
    );
    let mut state = EntityState::<Blogs>::default();

    drive(&mut state, EntityAction::get_by_id("b9"), &env).await;

    assert!(state.current.is_none());
    assert_eq!(state.error.as_deref(), Some("Not Found"));
    assert_eq!(transport.requests().len(), 1);
    assert_eq!(transport.requests()[0].to_string(), "GET /blog/blogByID?id=b9");
}

#[tokio::test]
async fn test_update_sends_partial_fields_with_status() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Put,
        "/blog/edit-blog/b1",
        Reply::ok(json!({ "data": blog_json("b1", "Renamed", "published") })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    let patch = crate::entities::BlogPatch {
        title: Some("Renamed".to_string()),
        status: PublishStatus::Published,
        ..Default::default()
    };

    drive(&mut state, EntityAction::update("b1", patch), &env).await;

    assert!(!state.flags.update);
    assert_eq!(state.current.as_ref().map(|b| b.title.as_str()), Some("Renamed"));
    let sent = transport.requests();
    let RequestBody::Multipart(form) = &sent[0].body else {
        panic!("update must be multipart");
    };
    assert_eq!(form.text_value("title"), Some("Renamed"));
    assert_eq!(form.text_value("status"), Some("published"));
    assert!(!form.contains("slug"));
    assert!(!form.contains("image"));
}

#[tokio::test]
async fn test_delete_only_clears_flag() {
    let transport = ScriptedTransport::new();
    transport.on(Method::Delete, "/blog/delete-blog", Reply::ok(json!({ "message": "Deleted" })));
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    state.list.records = vec![blog("abc123", "Doomed", "draft")];

    let delete = EntityAction::delete("abc123");
    let request = delete.request().unwrap();
    let results = drive(&mut state, delete, &env).await;

    assert_eq!(
        results,
        vec![EntityAction::Deleted { request, id: "abc123".to_string() }]
    );
    assert!(!state.flags.delete);
    assert_eq!(state.list.records.len(), 1);
    assert_eq!(transport.requests()[0].query_value("id"), Some("abc123"));
}

#[tokio::test]
async fn test_server_reported_error_stops_fallbacks() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Delete,
        "/blog/delete-blog",
        Reply::ok(json!({ "error": { "message": "Blog is referenced by a tag" } })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();

    drive(&mut state, EntityAction::delete("b1"), &env).await;

    assert_eq!(state.error.as_deref(), Some("Blog is referenced by a tag"));
    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_publish_replaces_record_in_place() {
    let transport = ScriptedTransport::new();
    transport.on(
        Method::Patch,
        "/blog/update-status",
        Reply::ok(json!({ "data": blog_json("b2", "Second", "published") })),
    );
    let env = env(&transport);
    let mut state = EntityState::<Blogs>::default();
    state.list.records = vec![
        blog("b1", "First", "draft"),
        blog("b2", "Second", "draft"),
        blog("b3", "Third", "draft"),
    ];
    state.current = Some(blog("b2", "Second", "draft"));

    drive(
        &mut state,
        EntityAction::publish("b2", PublishStatus::Published),
        &env,
    )
    .await;

    assert!(!state.flags.publish);
    let statuses: Vec<PublishStatus> = state.list.records.iter().map(|b| b.status).collect();
    assert_eq!(
        statuses,
        vec![PublishStatus::Draft, PublishStatus::Published, PublishStatus::Draft]
    );
    assert_eq!(state.current.map(|b| b.status), Some(PublishStatus::Published));
    assert_eq!(
        transport.requests()[0].body,
        RequestBody::Json(json!({ "status": "published" }))
    );
}

#[tokio::test]
async fn test_publish_unsupported_for_tags() {
    let transport = ScriptedTransport::new();
    let env = env(&transport);
    let mut state = EntityState::<Tags>::default();

    let publish = EntityAction::publish("t1", PublishStatus::Published);
    let request = publish.request().unwrap();
    let results = drive(&mut state, publish, &env).await;

    assert!(results[0].completes(Operation::Publish));
    assert!(results[0].answers(request));
    assert!(!state.flags.publish);
    assert_eq!(state.error.as_deref(), Some("Publishing is not supported for tags"));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_fallback_for_every_operation_is_named() {
    for operation in [
        Operation::Add,
        Operation::GetList,
        Operation::GetOne,
        Operation::Update,
        Operation::Delete,
        Operation::Publish,
    ] {
        assert!(Blogs::fallback_message(operation).starts_with("Failed to "));
    }
}
