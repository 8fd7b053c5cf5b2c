pub mod config;
pub mod db;
pub mod handlers;
pub mod metrics;
pub mod repo;

use std::sync::Arc;

use axum::{
    extract::State,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use common_http_errors::{http_error_metrics_layer, ApiError};

use crate::metrics::ProjectMetrics;
use crate::repo::ProjectStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub metrics: Arc<ProjectMetrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            metrics: Arc::new(ProjectMetrics::new()?),
        })
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.metrics.render().map_err(ApiError::internal)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/projects/create", post(handlers::create_project))
        .route("/projects/getProject/:id", get(handlers::get_project))
        .with_state(state)
        .layer(middleware::from_fn(http_error_metrics_layer("project-service")))
}
