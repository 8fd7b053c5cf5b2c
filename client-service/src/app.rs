use std::sync::Arc;

use anyhow::Result;
use common_clients::ProjectClient;

use crate::metrics::ClientMetrics;
use crate::repo::ClientStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ClientStore>,
    pub projects: Arc<dyn ProjectClient>,
    pub metrics: Arc<ClientMetrics>,
}

impl AppState {
    pub fn new(store: Arc<dyn ClientStore>, projects: Arc<dyn ProjectClient>) -> Result<Self> {
        Ok(Self {
            store,
            projects,
            metrics: Arc::new(ClientMetrics::new()?),
        })
    }
}
