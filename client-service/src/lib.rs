pub mod app;
pub mod config;
pub mod db;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod repo;

use axum::{
    extract::State,
    middleware,
    response::Response,
    routing::{get, post},
    Router,
};
use common_http_errors::{http_error_metrics_layer, ApiError};

pub use app::AppState;

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
        .route("/clients/create", post(handlers::create_profile))
        .route("/clients/getClientDetails/:id", get(handlers::get_client_details))
        .route("/clients/createProject", post(handlers::create_project))
        .with_state(state)
        .layer(middleware::from_fn(http_error_metrics_layer("client-service")))
}
