pub mod config;
pub mod db;
pub mod handlers;
pub mod model;
pub mod repo;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Router,
};
use common_clients::ProjectClient;
use common_http_errors::http_error_metrics_layer;
use prometheus::{Encoder, TextEncoder};

use crate::repo::FreelancerStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FreelancerStore>,
    pub projects: Arc<dyn ProjectClient>,
}

async fn health() -> &'static str {
    "ok"
}

/// Only the shared default registry; this service keeps no counters of its own.
async fn render_metrics() -> Result<String, StatusCode> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(render_metrics))
        .route("/freelancers/create", post(handlers::create_profile))
        .route("/freelancers/getProject/:id", get(handlers::get_project))
        .with_state(state)
        .layer(middleware::from_fn(http_error_metrics_layer("freelancer-service")))
}
