use axum::{
    extract::{Query, State},
    Json,
};
use chrono::SecondsFormat;
use common_auth::Role;
use common_http_errors::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::model::{IdentityView, NewUser};
use crate::passwords::{verify_against_dummy, verify_password};
use crate::AppState;

pub async fn register_user(
    State(state): State<AppState>,
    Json(new_user): Json<NewUser>,
) -> ApiResult<Json<IdentityView>> {
    let record = state.provisioner.register(new_user).await?;
    Ok(Json(IdentityView::from(&record)))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub expires_at: String,
    pub user: IdentityView,
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized {
        code: "invalid_credentials",
        message: Some("Invalid credentials. Please try again.".into()),
    }
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(login): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let LoginRequest { username, password } = login;

    let Some(record) = state
        .store
        .find_by_username(username.trim())
        .await
        .map_err(ApiError::internal)?
    else {
        verify_against_dummy(&password);
        state.metrics.login_attempt("unknown_user");
        return Err(invalid_credentials());
    };

    if !verify_password(&password, &record.password_hash) {
        state.metrics.login_attempt("invalid_password");
        return Err(invalid_credentials());
    }

    let issued = state
        .token_signer
        .issue(&record.username, record.role, record.id)
        .map_err(|err| {
            error!(user_id = record.id, error = %err, "Failed to issue token");
            ApiError::internal("Unable to issue authentication token.")
        })?;
    state.metrics.login_attempt("success");
    info!(user_id = record.id, role = %record.role, "login succeeded");

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
        expires_at: issued.expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        user: IdentityView::from(&record),
    }))
}

#[derive(Deserialize)]
pub struct RoleQuery {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub username: String,
    pub role: Role,
}

pub async fn lookup_role(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<Json<RoleResponse>> {
    let record = state
        .store
        .find_by_username(query.username.trim())
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("unknown_user"))?;

    Ok(Json(RoleResponse {
        username: record.username,
        role: record.role,
    }))
}
