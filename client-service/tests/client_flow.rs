use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use client_service::repo::{ClientStore, InMemoryClientStore};
use client_service::{build_router, AppState};
use common_clients::HttpProjectClient;
use common_security::test_identity_headers;
use http_body_util::BodyExt;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(store: &InMemoryClientStore, project_url: &str) -> (Router, AppState) {
    let projects = HttpProjectClient::new(project_url, Duration::from_secs(2)).unwrap();
    let state = AppState::new(Arc::new(store.clone()), Arc::new(projects)).unwrap();
    (build_router(state.clone()), state)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(resp: Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn project_json(id: i64, client_id: i64) -> Value {
    json!({
        "id": id,
        "clientId": client_id,
        "title": "Logo",
        "description": "",
        "budget": 250.0,
        "durationDays": 7,
        "status": "OPEN",
        "assignedFreelancerId": null,
        "createdAt": "2026-03-01T12:00:00Z"
    })
}

async fn seed_profile(router: &Router, user_id: i64) -> Value {
    let resp = router
        .clone()
        .oneshot(post_json(
            "/clients/create",
            json!({"userId": user_id, "name": "Alice", "email": "alice", "password": "$argon2id$hash"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    json_body(resp).await
}

#[tokio::test]
async fn profile_creation_returns_reference() {
    let store = InMemoryClientStore::new();
    let (router, _) = app(&store, "http://127.0.0.1:9");

    let body = seed_profile(&router, 42).await;
    assert_eq!(body, json!({"profileId": 1, "userId": 42}));

    let resp = router
        .clone()
        .oneshot(Request::builder().uri("/clients/getClientDetails/1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let details = json_body(resp).await;
    assert_eq!(details["userId"], 42);
    assert_eq!(details["projectIds"], json!([]));
    assert!(details.get("passwordHash").is_none());

    let resp = router
        .oneshot(Request::builder().uri("/clients/getClientDetails/9").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "unknown_client");
}

#[tokio::test]
async fn create_project_uses_caller_identity_and_links_project() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/projects/create")
                .json_body_partial(r#"{"clientId": 42, "title": "Logo", "budget": 250.0, "duration": 7}"#);
            then.status(200).json_body(project_json(100, 42));
        })
        .await;

    let store = InMemoryClientStore::new();
    let (router, _) = app(&store, &server.base_url());
    seed_profile(&router, 42).await;

    let mut req = post_json(
        "/clients/createProject",
        json!({"title": "Logo", "budget": 250.0, "duration": 7}),
    );
    test_identity_headers!(req, username = "alice", user_id = 42);
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["id"], 100);
    assert_eq!(body["status"], "OPEN");
    create.assert_hits_async(1).await;

    let profile = store.find_by_id(1).await.unwrap().unwrap();
    assert_eq!(profile.project_ids, vec![100]);
}

#[tokio::test]
async fn create_project_without_identity_is_unauthorized() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/create");
            then.status(200).json_body(project_json(1, 1));
        })
        .await;

    let store = InMemoryClientStore::new();
    let (router, _) = app(&store, &server.base_url());
    let resp = router
        .oneshot(post_json(
            "/clients/createProject",
            json!({"title": "Logo", "budget": 250.0, "duration": 7}),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_identity");
    create.assert_hits_async(0).await;
}

#[tokio::test]
async fn project_service_failure_is_bad_gateway() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/create");
            then.status(500).body("boom");
        })
        .await;

    let store = InMemoryClientStore::new();
    let (router, state) = app(&store, &server.base_url());
    seed_profile(&router, 42).await;

    let mut req = post_json(
        "/clients/createProject",
        json!({"title": "Logo", "budget": 250.0, "duration": 7}),
    );
    test_identity_headers!(req, username = "alice", user_id = 42);
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "upstream_unavailable");
    assert!(store.find_by_id(1).await.unwrap().unwrap().project_ids.is_empty());
    assert_eq!(state.metrics.divergence_count("unknown_user"), 0);
}

#[tokio::test]
async fn missing_profile_after_remote_create_is_counted() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/create");
            then.status(200).json_body(project_json(5, 77));
        })
        .await;

    let store = InMemoryClientStore::new();
    let (router, state) = app(&store, &server.base_url());

    let mut req = post_json(
        "/clients/createProject",
        json!({"title": "Logo", "budget": 250.0, "duration": 7}),
    );
    test_identity_headers!(req, username = "ghost", user_id = 77);
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "unknown_user");
    create.assert_hits_async(1).await;
    assert_eq!(state.metrics.divergence_count("unknown_user"), 1);
}

#[tokio::test]
async fn invalid_project_is_rejected_before_remote_call() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/projects/create");
            then.status(200).json_body(project_json(1, 42));
        })
        .await;

    let store = InMemoryClientStore::new();
    let (router, _) = app(&store, &server.base_url());

    let mut req = post_json(
        "/clients/createProject",
        json!({"title": "  ", "budget": 10.0, "duration": 3}),
    );
    test_identity_headers!(req, username = "alice", user_id = 42);
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    create.assert_hits_async(0).await;
}
