use serde_json::Value;

use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, ContainerDetails, ContainerStatusCounts, ContainerSummary, CreateContainer,
    PaginationParams,
};

/// `/api/environments/{env}/containers`
#[derive(Debug, Clone, Copy)]
pub struct ContainersApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> ContainersApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, environment_id: &str, params: &PaginationParams) -> Result<Vec<ContainerSummary>, ClientError> {
        let resp: ApiResponse<Vec<ContainerSummary>> = self
            .client
            .get_with_params(&environment_path(environment_id, "containers"), params)?;
        Ok(resp.data)
    }

    pub fn get(&self, environment_id: &str, container_id: &str) -> Result<ContainerDetails, ClientError> {
        let resp: ApiResponse<ContainerDetails> = self.client.get(&container_path(environment_id, container_id))?;
        Ok(resp.data)
    }

    pub fn create(&self, environment_id: &str, input: &CreateContainer) -> Result<ContainerDetails, ClientError> {
        let resp: ApiResponse<ContainerDetails> = self
            .client
            .post(&environment_path(environment_id, "containers"), input)?;
        Ok(resp.data)
    }

    pub fn start(&self, environment_id: &str, container_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, container_id, "start")
    }

    pub fn stop(&self, environment_id: &str, container_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, container_id, "stop")
    }

    pub fn restart(&self, environment_id: &str, container_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, container_id, "restart")
    }

    pub fn delete(&self, environment_id: &str, container_id: &str) -> Result<(), ClientError> {
        self.client.delete::<Value>(&container_path(environment_id, container_id))?;
        Ok(())
    }

    pub fn counts(&self, environment_id: &str) -> Result<ContainerStatusCounts, ClientError> {
        let resp: ApiResponse<ContainerStatusCounts> =
            self.client.get(&environment_path(environment_id, "containers/counts"))?;
        Ok(resp.data)
    }

    fn action(&self, environment_id: &str, container_id: &str, action: &str) -> Result<(), ClientError> {
        let path = format!("{}/{action}", container_path(environment_id, container_id));
        self.client.post_empty::<Value>(&path)?;
        Ok(())
    }
}

fn container_path(environment_id: &str, container_id: &str) -> String {
    environment_path(environment_id, &format!("containers/{container_id}"))
}
