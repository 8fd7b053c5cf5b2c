use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use client_service::config::ServiceConfig;
use client_service::repo::{ClientStore, InMemoryClientStore, PgClientStore};
use client_service::{build_router, db, AppState};
use common_clients::HttpProjectClient;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;

    let store: Arc<dyn ClientStore> = match &config.database_url {
        Some(url) => Arc::new(PgClientStore::new(db::connect(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using in-memory client store");
            Arc::new(InMemoryClientStore::new())
        }
    };
    let projects = HttpProjectClient::new(
        &config.project_service_url,
        Duration::from_secs(config.service_timeout_secs),
    )?;

    let app = build_router(AppState::new(store, Arc::new(projects))?);

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    info!(%addr, "starting client-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
