use anyhow::Context;
use api_gateway::{build_router, AppState, GatewayConfig, RoutePolicyTable};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use common_auth::JwtConfig;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env()?;
    let jwt_config = JwtConfig::from_env().context("failed to load JWT configuration")?;
    let policy = RoutePolicyTable::default();
    for entry in policy.entries() {
        info!(prefix = entry.prefix, visibility = ?entry.visibility, role = ?entry.required_role, "route policy");
    }

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods(
            [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS]
                .into_iter()
                .collect::<Vec<_>>(),
        )
        .allow_headers(
            [ACCEPT, CONTENT_TYPE, AUTHORIZATION]
                .into_iter()
                .collect::<Vec<_>>(),
        );

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    let state = AppState::new(config, &jwt_config, policy)?;
    let app = build_router(state).layer(cors);

    info!(%addr, "starting api-gateway");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
