use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::http::HttpRpc;
use crate::model::{ProfileRef, ProfileRequest};

/// Remote profile stores, one per profile-bearing role.
#[async_trait]
pub trait ProfileServices: Send + Sync {
    async fn create_client_profile(&self, request: &ProfileRequest) -> ClientResult<ProfileRef>;
    async fn create_freelancer_profile(&self, request: &ProfileRequest) -> ClientResult<ProfileRef>;
}

pub struct HttpProfileServices {
    clients: HttpRpc,
    freelancers: HttpRpc,
}

impl HttpProfileServices {
    pub fn new(client_service_url: &str, freelancer_service_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            clients: HttpRpc::new("client-service", client_service_url, timeout)?,
            freelancers: HttpRpc::new("freelancer-service", freelancer_service_url, timeout)?,
        })
    }
}

#[async_trait]
impl ProfileServices for HttpProfileServices {
    async fn create_client_profile(&self, request: &ProfileRequest) -> ClientResult<ProfileRef> {
        let rpc = &self.clients;
        rpc.call(rpc.client().post(rpc.url("/clients/create")).json(request))
            .await
    }

    async fn create_freelancer_profile(&self, request: &ProfileRequest) -> ClientResult<ProfileRef> {
        let rpc = &self.freelancers;
        rpc.call(rpc.client().post(rpc.url("/freelancers/create")).json(request))
            .await
    }
}
