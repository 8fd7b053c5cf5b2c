use std::time::Duration;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::http::HttpRpc;
use crate::model::{NewProject, ProjectRecord};

#[async_trait]
pub trait ProjectClient: Send + Sync {
    async fn create_project(&self, project: &NewProject) -> ClientResult<ProjectRecord>;
    async fn get_project_by_id(&self, id: i64) -> ClientResult<ProjectRecord>;
}

pub struct HttpProjectClient {
    rpc: HttpRpc,
}

impl HttpProjectClient {
    pub fn new(project_service_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            rpc: HttpRpc::new("project-service", project_service_url, timeout)?,
        })
    }
}

#[async_trait]
impl ProjectClient for HttpProjectClient {
    async fn create_project(&self, project: &NewProject) -> ClientResult<ProjectRecord> {
        let rpc = &self.rpc;
        rpc.call(rpc.client().post(rpc.url("/projects/create")).json(project))
            .await
    }

    async fn get_project_by_id(&self, id: i64) -> ClientResult<ProjectRecord> {
        let rpc = &self.rpc;
        rpc.call(rpc.client().get(rpc.url(&format!("/projects/getProject/{id}"))))
            .await
    }
}
