use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header::HOST, HeaderMap, HeaderName, HeaderValue, Request},
    response::Response,
};
use common_http_errors::ApiError;
use common_security::REQUEST_ID_HEADER;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app_state::AppState;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Relay an authorized request to the service owning its first path segment.
pub async fn forward(State(state): State<AppState>, request: Request<Body>) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let path = parts.uri.path();
    let upstream = state
        .config
        .upstream_for(path)
        .ok_or_else(|| ApiError::not_found("no_route"))?;

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(path);
    let url = format!("{}{}", upstream.base_url.trim_end_matches('/'), path_and_query);

    let body = to_bytes(body, state.config.max_body_bytes)
        .await
        .map_err(|err| ApiError::BadRequest {
            code: "invalid_body",
            message: Some(err.to_string()),
        })?;

    let mut headers = end_to_end(&parts.headers);
    headers.remove(HOST);
    if !headers.contains_key(REQUEST_ID_HEADER) {
        if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }
    }

    let result = state
        .http_client
        .request(parts.method.clone(), &url)
        .headers(headers)
        .body(body)
        .send()
        .await;

    let upstream_resp = match result {
        Ok(resp) => resp,
        Err(err) => {
            warn!(upstream = upstream.name, url = %url, error = %err, "upstream request failed");
            state.metrics.record_upstream_failure(upstream.name);
            return Err(ApiError::upstream(err));
        }
    };

    let status = upstream_resp.status();
    let headers = end_to_end(upstream_resp.headers());
    let bytes = upstream_resp.bytes().await.map_err(|err| {
        warn!(upstream = upstream.name, error = %err, "failed reading upstream body");
        state.metrics.record_upstream_failure(upstream.name);
        ApiError::upstream(err)
    })?;

    state.metrics.record_upstream(upstream.name, status);
    debug!(upstream = upstream.name, method = %parts.method, status = status.as_u16(), "relayed upstream response");

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_by_hop_headers_are_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("transfer-encoding", HeaderValue::from_static("chunked"));
        headers.insert("authorization", HeaderValue::from_static("Bearer x"));
        headers.insert("userid", HeaderValue::from_static("42"));

        let kept = end_to_end(&headers);
        assert_eq!(kept.len(), 2);
        assert!(kept.contains_key("authorization"));
        assert!(kept.contains_key("userid"));
    }
}
