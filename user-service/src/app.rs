use std::sync::Arc;

use anyhow::Result;
use common_auth::{JwtConfig, TokenSigner};
use common_clients::ProfileServices;

use crate::metrics::UserMetrics;
use crate::provisioning::Provisioner;
use crate::repo::IdentityStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn IdentityStore>,
    pub provisioner: Arc<Provisioner>,
    pub token_signer: Arc<TokenSigner>,
    pub metrics: Arc<UserMetrics>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        profiles: Arc<dyn ProfileServices>,
        jwt: &JwtConfig,
    ) -> Result<Self> {
        let metrics = Arc::new(UserMetrics::new()?);
        let provisioner = Arc::new(Provisioner::new(store.clone(), profiles, metrics.clone()));
        Ok(Self {
            store,
            provisioner,
            token_signer: Arc::new(TokenSigner::new(jwt)),
            metrics,
        })
    }
}
