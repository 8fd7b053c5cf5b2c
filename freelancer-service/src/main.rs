use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common_clients::HttpProjectClient;
use freelancer_service::config::ServiceConfig;
use freelancer_service::repo::{FreelancerStore, InMemoryFreelancerStore, PgFreelancerStore};
use freelancer_service::{build_router, db, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env()?;
    let store: Arc<dyn FreelancerStore> = match &config.database_url {
        Some(url) => Arc::new(PgFreelancerStore::new(db::connect(url).await?)),
        None => {
            warn!("DATABASE_URL not set; using in-memory freelancer store");
            Arc::new(InMemoryFreelancerStore::new())
        }
    };
    let projects = HttpProjectClient::new(
        &config.project_service_url,
        Duration::from_secs(config.service_timeout_secs),
    )?;
    let app = build_router(AppState {
        store,
        projects: Arc::new(projects),
    });

    let ip: std::net::IpAddr = config
        .host
        .parse()
        .with_context(|| format!("invalid HOST '{}'", config.host))?;
    let addr = SocketAddr::from((ip, config.port));

    info!(%addr, "starting freelancer-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
