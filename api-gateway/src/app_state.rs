use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use common_auth::{JwtConfig, JwtVerifier};
use reqwest::Client;

use crate::config::GatewayConfig;
use crate::metrics::GatewayMetrics;
use crate::policy::RoutePolicyTable;

#[derive(Clone)]
pub struct AppState {
    pub policy: Arc<RoutePolicyTable>,
    pub verifier: Arc<JwtVerifier>,
    pub metrics: Arc<GatewayMetrics>,
    pub config: Arc<GatewayConfig>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: GatewayConfig, jwt: &JwtConfig, policy: RoutePolicyTable) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        Ok(Self {
            policy: Arc::new(policy),
            verifier: Arc::new(JwtVerifier::new(jwt)),
            metrics: Arc::new(GatewayMetrics::new()?),
            config: Arc::new(config),
            http_client,
        })
    }
}
