use axum::{body::Body, http::{Request, StatusCode}, routing::get, Json, Router};
use common_security::{test_identity_headers, IdentityContext};
use tower::ServiceExt;

async fn whoami(ctx: IdentityContext) -> Json<IdentityContext> {
    Json(ctx)
}

fn app() -> Router {
    Router::new().route("/whoami", get(whoami))
}

#[tokio::test]
async fn extractor_trusts_injected_headers() {
    let mut req = Request::builder().uri("/whoami").body(Body::empty()).unwrap();
    test_identity_headers!(req, username="alice", user_id=42);

    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["userId"], 42);
}

#[tokio::test]
async fn extractor_rejects_requests_without_identity() {
    let req = Request::builder().uri("/whoami").body(Body::empty()).unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_identity");
}
