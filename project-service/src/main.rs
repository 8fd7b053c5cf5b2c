use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use project_service::config::ServiceConfig;
use project_service::repo::{InMemoryProjectStore, PgProjectStore, ProjectStore};
use project_service::{build_router, db, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    let store: Arc<dyn ProjectStore> = match &config.database_url {
        Some(url) => Arc::new(PgProjectStore::new(db::connect(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using in-memory project store");
            Arc::new(InMemoryProjectStore::new())
        }
    };
    let app = build_router(AppState::new(store)?);

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    info!(%addr, "starting project-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
