//! Identity headers set by the gateway after a token has been verified.
//!
//! Downstream services trust these values as-is; the gateway removes any
//! caller-supplied copies before forwarding.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use common_auth::Principal;

use crate::error::SecurityError;

pub const USERNAME_HEADER: HeaderName = HeaderName::from_static("username");
/// Sent as `userId`; header names are case-insensitive on the wire.
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("userid");
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Remove every identity header a caller may have supplied.
pub fn strip_identity(headers: &mut HeaderMap) {
    headers.remove(USERNAME_HEADER);
    headers.remove(USER_ID_HEADER);
}

/// Overwrite the identity headers with the verified principal.
pub fn inject_identity(headers: &mut HeaderMap, principal: &Principal) -> Result<(), SecurityError> {
    let username = HeaderValue::from_str(&principal.username)
        .map_err(|_| SecurityError::InvalidHeader("username"))?;
    strip_identity(headers);
    headers.insert(USERNAME_HEADER, username);
    headers.insert(USER_ID_HEADER, HeaderValue::from(principal.user_id));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_auth::Role;

    #[test]
    fn injected_values_replace_spoofed_ones() {
        let mut headers = HeaderMap::new();
        headers.append("username", HeaderValue::from_static("mallory"));
        headers.append("username", HeaderValue::from_static("eve"));
        headers.insert("userId", HeaderValue::from_static("1"));

        inject_identity(&mut headers, &Principal::new("alice", Role::Client, 42)).unwrap();

        let names: Vec<_> = headers.get_all(USERNAME_HEADER).iter().collect();
        assert_eq!(names, vec!["alice"]);
        assert_eq!(headers.get("userId").unwrap(), "42");
    }

    #[test]
    fn username_with_control_bytes_is_refused() {
        let mut headers = HeaderMap::new();
        let err = inject_identity(&mut headers, &Principal::new("bad\nname", Role::Client, 1))
            .expect_err("control byte");
        assert!(matches!(err, SecurityError::InvalidHeader("username")));
        assert!(headers.is_empty());
    }

    #[test]
    fn strip_removes_identity_only() {
        let mut headers = HeaderMap::new();
        headers.insert("username", HeaderValue::from_static("mallory"));
        headers.insert("userid", HeaderValue::from_static("7"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        strip_identity(&mut headers);

        assert!(headers.get(USERNAME_HEADER).is_none());
        assert!(headers.get(USER_ID_HEADER).is_none());
        assert_eq!(headers.len(), 1);
    }
}
