use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common_auth::JwtConfig;
use common_clients::HttpProfileServices;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use user_service::config::UserServiceConfig;
use user_service::repo::{IdentityStore, InMemoryIdentityStore, PgIdentityStore};
use user_service::{build_router, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = UserServiceConfig::from_env()?;
    let jwt_config = JwtConfig::from_env().context("failed to load JWT configuration")?;

    let store: Arc<dyn IdentityStore> = match &config.database_url {
        Some(url) => Arc::new(PgIdentityStore::new(db::connect(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using in-memory identity store");
            Arc::new(InMemoryIdentityStore::new())
        }
    };
    let profiles = HttpProfileServices::new(
        &config.client_service_url,
        &config.freelancer_service_url,
        Duration::from_secs(config.service_timeout_secs),
    )?;

    let state = AppState::new(store, Arc::new(profiles), &jwt_config)?;
    let app = build_router(state);

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    info!(%addr, "starting user-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
