use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::types::{ApiResponse, DockerInfo, HealthStatus, PruneResult, SystemInfo, VersionInfo};

/// Server-wide endpoints plus per-environment Docker info and prune.
#[derive(Debug, Clone, Copy)]
pub struct SystemApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> SystemApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn info(&self) -> Result<SystemInfo, ClientError> {
        let resp: ApiResponse<SystemInfo> = self.client.get("/api/system/info")?;
        Ok(resp.data)
    }

    pub fn docker_info(&self, environment_id: &str) -> Result<DockerInfo, ClientError> {
        let resp: ApiResponse<DockerInfo> = self.client.get(&environment_path(environment_id, "docker/info"))?;
        Ok(resp.data)
    }

    /// Remove unused containers, images, volumes and networks.
    pub fn prune(&self, environment_id: &str) -> Result<PruneResult, ClientError> {
        let resp: ApiResponse<PruneResult> = self
            .client
            .post_empty(&environment_path(environment_id, "system/prune"))?;
        Ok(resp.data)
    }

    /// `/api/health` answers with a bare object, no envelope.
    pub fn health(&self) -> Result<HealthStatus, ClientError> {
        self.client.get("/api/health")
    }

    pub fn version(&self) -> Result<VersionInfo, ClientError> {
        let resp: ApiResponse<VersionInfo> = self.client.get("/api/system/version")?;
        Ok(resp.data)
    }
}
