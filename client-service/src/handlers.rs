use axum::{
    extract::{Path, State},
    Json,
};
use common_clients::{NewProject, ProfileRef, ProfileRequest, ProjectRecord};
use common_http_errors::{ApiError, ApiResult};
use common_security::IdentityContext;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::model::{ClientProfile, NewClientProfile};
use crate::repo::RepoError;
use crate::AppState;

fn repo_error(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate(_) => ApiError::Conflict {
            code: "duplicate_profile",
            message: Some(err.to_string()),
        },
        RepoError::Storage(_) => ApiError::internal(err),
    }
}

pub async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> ApiResult<Json<ProfileRef>> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(ApiError::invalid_input("name and email are required"));
    }
    let profile = state
        .store
        .insert(NewClientProfile::from(req))
        .await
        .map_err(repo_error)?;
    info!(profile_id = profile.profile_id, user_id = profile.user_id, "client profile created");
    Ok(Json(ProfileRef {
        profile_id: profile.profile_id,
        user_id: profile.user_id,
    }))
}

pub async fn get_client_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ClientProfile>> {
    state
        .store
        .find_by_id(id)
        .await
        .map_err(repo_error)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("unknown_client"))
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub budget: f64,
    pub duration: i32,
}

/// Creates the project remotely, then links it to the caller's profile.
/// A failed link leaves the remote project in place.
pub async fn create_project(
    State(state): State<AppState>,
    identity: IdentityContext,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<Json<ProjectRecord>> {
    if req.title.trim().is_empty() {
        return Err(ApiError::invalid_input("title is required"));
    }
    if !req.budget.is_finite() || req.budget < 0.0 || req.duration <= 0 {
        return Err(ApiError::invalid_input("budget must be non-negative and duration positive"));
    }

    let project = state
        .projects
        .create_project(&NewProject {
            client_id: identity.user_id,
            title: req.title.trim().to_string(),
            description: req.description,
            budget: req.budget,
            duration: req.duration,
        })
        .await
        .map_err(|err| {
            warn!(user_id = identity.user_id, error = %err, "project service call failed");
            ApiError::upstream(err)
        })?;

    match state.store.append_project(identity.user_id, project.id).await {
        Ok(Some(_)) => {
            state.metrics.project_created();
            info!(
                user_id = identity.user_id,
                username = %identity.username,
                project_id = project.id,
                "project created and linked"
            );
            Ok(Json(project))
        }
        Ok(None) => {
            warn!(
                user_id = identity.user_id,
                project_id = project.id,
                "project created for a user without a client profile"
            );
            state.metrics.link_divergence("unknown_user");
            Err(ApiError::NotFound {
                code: "unknown_user",
                message: Some(format!("no client profile for user {}", identity.user_id)),
            })
        }
        Err(err) => {
            error!(
                user_id = identity.user_id,
                project_id = project.id,
                error = %err,
                "project created but linking it to the client profile failed"
            );
            state.metrics.link_divergence("storage");
            Err(ApiError::internal(err))
        }
    }
}
