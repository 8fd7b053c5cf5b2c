use axum::{
    extract::{Path, State},
    Json,
};
use common_clients::{ProfileRef, ProfileRequest, ProjectRecord};
use common_http_errors::{ApiError, ApiResult};
use tracing::{info, warn};

use crate::repo::RepoError;
use crate::AppState;

pub async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> ApiResult<Json<ProfileRef>> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::invalid_input("name and email are required"));
    }
    let profile = state.store.insert(&req).await.map_err(|err| match err {
        RepoError::Duplicate(_) => ApiError::Conflict {
            code: "duplicate_profile",
            message: Some(err.to_string()),
        },
        RepoError::Storage(_) => ApiError::internal(err),
    })?;
    info!(profile_id = profile.profile_id, user_id = profile.user_id, "freelancer profile created");
    Ok(Json(ProfileRef {
        profile_id: profile.profile_id,
        user_id: profile.user_id,
    }))
}

/// Read-through to the project service.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectRecord>> {
    match state.projects.get_project_by_id(id).await {
        Ok(project) => Ok(Json(project)),
        Err(err) if err.is_not_found() => Err(ApiError::not_found("unknown_project")),
        Err(err) => {
            warn!(project_id = id, error = %err, "project lookup failed");
            Err(ApiError::upstream(err))
        }
    }
}
