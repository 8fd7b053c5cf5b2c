use common_http_errors::{ApiError, http_error_metrics_layer};
use axum::{Router, routing::get, http::StatusCode};
use axum::middleware;
use prometheus::{Encoder, TextEncoder};
use std::sync::atomic::{AtomicUsize, Ordering};
use once_cell::sync::Lazy;
use tower::ServiceExt; // for oneshot

static DYNAMIC_COUNTER: Lazy<AtomicUsize> = Lazy::new(|| AtomicUsize::new(0));

// Emits a different error code each time.
async fn dyn_error() -> Result<&'static str, ApiError> {
    let n = DYNAMIC_COUNTER.fetch_add(1, Ordering::Relaxed);
    let code = format!("dyn_code_{}", n);
    Err(ApiError::BadRequest { code: Box::leak(code.into_boxed_str()), message: None })
}

async fn conflict() -> Result<&'static str, ApiError> {
    Err(ApiError::Conflict { code: "duplicate_username", message: None })
}

fn rendered_metrics() -> String {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[tokio::test]
async fn error_code_cardinality_guard_caps_labels() {
    let app = Router::new()
        .route("/err", get(dyn_error))
        .route("/conflict", get(conflict))
        .layer(middleware::from_fn(http_error_metrics_layer("test-svc")));

    let resp = app.clone().oneshot(axum::http::Request::builder().uri("/conflict").body(axum::body::Body::empty()).unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // More requests than MAX_ERROR_CODES (40) to trigger overflow label usage.
    let total = 50;
    for _ in 0..total {
        let resp = app.clone().oneshot(axum::http::Request::builder().uri("/err").body(axum::body::Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let text = rendered_metrics();
    assert!(text.contains(r#"http_errors_total{code="duplicate_username",service="test-svc",status="409"} 1"#), "{text}");
    assert!(text.contains(r#"code="overflow""#), "{text}");
    assert!(text.contains("http_error_code_overflow_total"), "{text}");
}
