use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, HeaderMap, HeaderName};
use serde::{Deserialize, Serialize};
use tracing::Span;
use common_http_errors::ApiError;

use crate::error::SecurityError;
use crate::headers::{REQUEST_ID_HEADER, USERNAME_HEADER, USER_ID_HEADER};

/// Caller identity as injected by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContext {
    pub username: String,
    pub user_id: i64,
    pub request_id: Option<String>,
}

/// Values are read as UTF-8: the gateway writes usernames byte-for-byte,
/// so non-ASCII names arrive as obs-text.
fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl IdentityContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SecurityError> {
        let username = header_str(headers, &USERNAME_HEADER)
            .ok_or(SecurityError::MissingIdentity("username"))?
            .to_string();
        let user_id = header_str(headers, &USER_ID_HEADER)
            .ok_or(SecurityError::MissingIdentity("userId"))?
            .parse::<i64>()
            .map_err(|_| SecurityError::InvalidHeader("userId"))?;
        let request_id = header_str(headers, &REQUEST_ID_HEADER).map(str::to_string);

        Ok(Self { username, user_id, request_id })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for IdentityContext where S: Send + Sync {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = IdentityContext::from_headers(&parts.headers)?;

        Span::current().record("user_id", tracing::field::display(ctx.user_id));
        if let Some(rid) = ctx.request_id.as_ref() {
            Span::current().record("request_id", tracing::field::display(rid));
        }

        Ok(ctx)
    }
}
