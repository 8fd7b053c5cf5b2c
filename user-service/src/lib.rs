pub mod app;
pub mod config;
pub mod db;
pub mod metrics;
pub mod model;
pub mod passwords;
pub mod provisioning;
pub mod repo;
pub mod user_handlers;

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
        .route("/users/register", post(user_handlers::register_user))
        .route("/users/login", post(user_handlers::login_user))
        .route("/users/role", get(user_handlers::lookup_role))
        .with_state(state)
        .layer(middleware::from_fn(http_error_metrics_layer("user-service")))
}
