pub mod app_state;
pub mod authorizer;
pub mod config;
pub mod metrics;
pub mod policy;
pub mod proxy;

use axum::{
    extract::State,
    middleware,
    response::Response,
    routing::get,
    Router,
};
use common_http_errors::{http_error_metrics_layer, ApiError};

pub use crate::app_state::AppState;
pub use crate::authorizer::{decide, AuthDecision, Rejection};
pub use crate::config::GatewayConfig;
pub use crate::metrics::GatewayMetrics;
pub use crate::policy::{RoutePolicy, RoutePolicyTable, Visibility};

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(state): State<AppState>) -> Result<Response, ApiError> {
    state.metrics.render().map_err(ApiError::internal)
}

/// Gateway router: health and metrics are served locally, everything else
/// goes through the authorizer and on to an upstream.
pub fn build_router(state: AppState) -> Router {
    let proxied = Router::new()
        .fallback(proxy::forward)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorizer::authorize,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(proxied)
        .layer(middleware::from_fn(http_error_metrics_layer("api-gateway")))
}
