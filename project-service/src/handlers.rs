use axum::{
    extract::{Path, State},
    Json,
};
use common_clients::{NewProject, ProjectRecord};
use common_http_errors::{ApiError, ApiResult};
use tracing::info;

use crate::AppState;

fn validate(project: &NewProject) -> ApiResult<()> {
    if project.title.trim().is_empty() {
        return Err(ApiError::invalid_input("title is required"));
    }
    if !project.budget.is_finite() || project.budget < 0.0 {
        return Err(ApiError::invalid_input("budget must be a non-negative number"));
    }
    if project.duration <= 0 {
        return Err(ApiError::invalid_input("duration must be positive"));
    }
    Ok(())
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(mut project): Json<NewProject>,
) -> ApiResult<Json<ProjectRecord>> {
    validate(&project)?;
    project.title = project.title.trim().to_string();

    let record = state.store.insert(project).await.map_err(ApiError::internal)?;
    state.metrics.project_created();
    info!(project_id = record.id, client_id = record.client_id, "project created");
    Ok(Json(record))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectRecord>> {
    state
        .store
        .find_by_id(id)
        .await
        .map_err(ApiError::internal)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("unknown_project"))
}
