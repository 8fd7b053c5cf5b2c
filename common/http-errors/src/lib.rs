use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use axum::{
    body::Body,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};
use serde::Serialize;

pub const ERROR_CODE_HEADER: &str = "X-Error-Code";

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")] pub missing_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")] pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: Option<String> },
    Unauthorized { code: &'static str, message: Option<String> },
    Forbidden { missing_role: Option<&'static str> },
    NotFound { code: &'static str, message: Option<String> },
    Conflict { code: &'static str, message: Option<String> },
    UpstreamUnavailable { message: Option<String> },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self { Self::Internal { message: Some(e.to_string()) } }
    pub fn bad_request(code: &'static str) -> Self { Self::BadRequest { code, message: None } }
    pub fn invalid_input(message: impl Into<String>) -> Self { Self::BadRequest { code: "invalid_input", message: Some(message.into()) } }
    pub fn not_found(code: &'static str) -> Self { Self::NotFound { code, message: None } }
    pub fn upstream<E: std::fmt::Display>(e: E) -> Self { Self::UpstreamUnavailable { message: Some(e.to_string()) } }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. } => code,
            ApiError::Forbidden { .. } => "forbidden",
            ApiError::UpstreamUnavailable { .. } => "upstream_unavailable",
            ApiError::Internal { .. } => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_code = self.code();
        let body = match self {
            ApiError::Forbidden { missing_role } => ErrorBody {
                code: error_code.into(),
                missing_role: missing_role.map(Into::into),
                message: None,
            },
            ApiError::BadRequest { message, .. }
            | ApiError::Unauthorized { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::Conflict { message, .. }
            | ApiError::UpstreamUnavailable { message }
            | ApiError::Internal { message } => ErrorBody { code: error_code.into(), missing_role: None, message },
        };
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert(ERROR_CODE_HEADER, val);
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Distinct `code` label values tracked before collapsing into `overflow`.
pub const MAX_ERROR_CODES: usize = 40;
const OVERFLOW_CODE: &str = "overflow";

static HTTP_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new(
            "http_errors_total",
            "Count of HTTP error responses emitted (status >= 400)",
        ),
        &["service", "code", "status"],
    )
    .expect("http_errors_total");
    let _ = prometheus::default_registry().register(Box::new(c.clone()));
    c
});

static HTTP_ERROR_CODE_OVERFLOW: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new(
        "http_error_code_overflow_total",
        "Error responses whose code exceeded the label cardinality guard",
    )
    .expect("http_error_code_overflow_total");
    let _ = prometheus::default_registry().register(Box::new(c.clone()));
    c
});

static SEEN_CODES: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

fn code_label(code: &str) -> String {
    let mut seen = match SEEN_CODES.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if seen.contains(code) {
        return code.to_string();
    }
    if seen.len() >= MAX_ERROR_CODES {
        HTTP_ERROR_CODE_OVERFLOW.inc();
        return OVERFLOW_CODE.to_string();
    }
    seen.insert(code.to_string());
    code.to_string()
}

/// Count a response in `http_errors_total` when its status is >= 400.
pub fn record_http_error(service: &str, resp: &Response) {
    let status = resp.status();
    if status.as_u16() < 400 {
        return;
    }
    let code = resp
        .headers()
        .get(ERROR_CODE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let label = code_label(code);
    HTTP_ERRORS_TOTAL
        .with_label_values(&[service, &label, status.as_str()])
        .inc();
}

type MiddlewareFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Middleware for `axum::middleware::from_fn` that records error responses.
pub fn http_error_metrics_layer(
    service: &'static str,
) -> impl Fn(Request<Body>, Next) -> MiddlewareFuture + Clone + Send + Sync + 'static {
    move |req: Request<Body>, next: Next| -> MiddlewareFuture {
        Box::pin(async move {
            let resp = next.run(req).await;
            record_http_error(service, &resp);
            if resp.status().is_server_error() {
                tracing::debug!(service, status = %resp.status(), "server error response");
            }
            resp
        })
    }
}
