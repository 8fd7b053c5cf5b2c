//! Per-request authorization in front of the proxy.
//!
//! A request is classified against the route policy table, then either
//! passed through (public), rejected, or forwarded with the verified
//! identity written into the trusted headers.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use common_auth::{bearer_token, AuthError, JwtVerifier, Principal, Role};
use common_http_errors::ApiError;
use common_security::{inject_identity, strip_identity};
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::policy::{is_canonical, RoutePolicyTable};

#[derive(Debug)]
pub enum Rejection {
    /// Empty or dot segments; refused before any policy lookup.
    NonCanonicalPath,
    MissingAuthHeader,
    Unauthorized(AuthError),
    Forbidden { required: Role, actual: Role },
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NonCanonicalPath => "no_route",
            Rejection::MissingAuthHeader => "missing_auth_header",
            Rejection::Unauthorized(err) => err.code(),
            Rejection::Forbidden { .. } => "forbidden",
        }
    }
}

impl From<Rejection> for ApiError {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::NonCanonicalPath => ApiError::not_found("no_route"),
            Rejection::MissingAuthHeader => ApiError::Unauthorized {
                code: "missing_auth_header",
                message: Some("Authorization header is required".into()),
            },
            Rejection::Unauthorized(err) => ApiError::Unauthorized {
                code: err.code(),
                message: Some(err.to_string()),
            },
            Rejection::Forbidden { required, .. } => ApiError::Forbidden {
                missing_role: Some(required.as_str()),
            },
        }
    }
}

#[derive(Debug)]
pub enum AuthDecision {
    PublicBypass,
    Authorized(Principal),
    Rejected(Rejection),
}

impl AuthDecision {
    /// Label used for `gateway_auth_decisions_total`.
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthDecision::PublicBypass => "public",
            AuthDecision::Authorized(_) => "authorized",
            AuthDecision::Rejected(rejection) => rejection.code(),
        }
    }
}

/// Decide what happens to a request for `path` carrying `headers`.
///
/// Public routes never look at `Authorization`.
pub fn decide(
    policy: &RoutePolicyTable,
    verifier: &JwtVerifier,
    path: &str,
    headers: &HeaderMap,
    now: DateTime<Utc>,
) -> AuthDecision {
    if !is_canonical(path) {
        return AuthDecision::Rejected(Rejection::NonCanonicalPath);
    }
    let route = policy.classify(path);
    if route.is_public() {
        return AuthDecision::PublicBypass;
    }

    let Some(value) = headers.get(AUTHORIZATION) else {
        return AuthDecision::Rejected(Rejection::MissingAuthHeader);
    };

    let principal = match bearer_token(value).and_then(|token| verifier.verify_at(&token, now)) {
        Ok(principal) => principal,
        Err(err) => return AuthDecision::Rejected(Rejection::Unauthorized(err)),
    };

    if let Some(required) = route.required_role {
        if principal.role != required {
            return AuthDecision::Rejected(Rejection::Forbidden {
                required,
                actual: principal.role,
            });
        }
    }

    AuthDecision::Authorized(principal)
}

/// Middleware wrapping the proxy fallback.
pub async fn authorize(State(state): State<AppState>, mut request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut decision = decide(&state.policy, &state.verifier, &path, request.headers(), Utc::now());

    if let AuthDecision::Authorized(principal) = &decision {
        if inject_identity(request.headers_mut(), principal).is_err() {
            decision = AuthDecision::Rejected(Rejection::Unauthorized(AuthError::InvalidClaim(
                "sub",
                principal.username.clone(),
            )));
        }
    }
    state.metrics.record_decision(decision.outcome());

    match decision {
        AuthDecision::PublicBypass => {
            strip_identity(request.headers_mut());
            debug!(path = %path, "public route, token not inspected");
        }
        AuthDecision::Authorized(principal) => {
            debug!(
                path = %path,
                username = %principal.username,
                user_id = principal.user_id,
                role = %principal.role,
                "request authorized"
            );
            request.extensions_mut().insert(principal);
        }
        AuthDecision::Rejected(rejection) => {
            match &rejection {
                Rejection::Forbidden { required, actual } => {
                    warn!(path = %path, %required, %actual, "role not permitted for route");
                }
                Rejection::Unauthorized(err) => {
                    warn!(path = %path, error = %err, "token rejected");
                }
                Rejection::MissingAuthHeader => {
                    warn!(path = %path, "authorization header missing");
                }
                Rejection::NonCanonicalPath => {
                    warn!(path = %path, "path with empty or dot segments refused");
                }
            }
            return ApiError::from(rejection).into_response();
        }
    }

    next.run(request).await
}
