use axum::http::HeaderValue;

use crate::error::{AuthError, AuthResult};

/// Token carried by an `Authorization` header value.
///
/// A literal `Bearer ` prefix is stripped when present; otherwise the whole
/// value is taken as the token.
pub fn bearer_token(value: &HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::MalformedToken("authorization header is not ASCII".to_string()))?
        .trim_start();

    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    if token.is_empty() || token == "Bearer" {
        return Err(AuthError::MalformedToken(
            "authorization header carries no token".to_string(),
        ));
    }

    Ok(token.to_owned())
}
