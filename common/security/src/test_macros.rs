//! Shared test helper macro for attaching gateway identity headers.
//! Usage: test_identity_headers!(req, username="alice", user_id=42);
#[macro_export]
macro_rules! test_identity_headers {
    ($req:expr, username=$username:expr, user_id=$user_id:expr) => {{
        let h = $req.headers_mut();
        h.insert("username", ::axum::http::HeaderValue::from_str($username).unwrap());
        h.insert("userid", ::axum::http::HeaderValue::from($user_id as i64));
    }};
}
