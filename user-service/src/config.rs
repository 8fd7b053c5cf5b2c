use anyhow::{Context, Result};
use common_clients::DEFAULT_TIMEOUT_SECS;
use std::env;

#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    pub host: String,
    pub port: u16,
    /// Postgres connection string; the in-memory store is used when absent.
    pub database_url: Option<String>,
    pub client_service_url: String,
    pub freelancer_service_url: String,
    pub service_timeout_secs: u64,
}

impl UserServiceConfig {
    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("invalid PORT '{value}'"))?,
            Err(_) => 8081,
        };
        let service_timeout_secs = env::var("SERVICE_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            client_service_url: env::var("CLIENT_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            freelancer_service_url: env::var("FREELANCER_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8083".to_string()),
            service_timeout_secs: service_timeout_secs.max(1),
        })
    }
}
