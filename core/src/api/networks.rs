use serde_json::Value;

use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, CreateNetwork, NetworkDetails, NetworkPruneReport, NetworkSummary, PaginationParams,
};

/// `/api/environments/{env}/networks`
#[derive(Debug, Clone, Copy)]
pub struct NetworksApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> NetworksApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, environment_id: &str, params: &PaginationParams) -> Result<Vec<NetworkSummary>, ClientError> {
        let resp: ApiResponse<Vec<NetworkSummary>> = self
            .client
            .get_with_params(&environment_path(environment_id, "networks"), params)?;
        Ok(resp.data)
    }

    pub fn get(&self, environment_id: &str, network_id: &str) -> Result<NetworkDetails, ClientError> {
        let resp: ApiResponse<NetworkDetails> = self
            .client
            .get(&environment_path(environment_id, &format!("networks/{network_id}")))?;
        Ok(resp.data)
    }

    pub fn create(&self, environment_id: &str, input: &CreateNetwork) -> Result<NetworkDetails, ClientError> {
        let resp: ApiResponse<NetworkDetails> = self
            .client
            .post(&environment_path(environment_id, "networks"), input)?;
        Ok(resp.data)
    }

    pub fn remove(&self, environment_id: &str, network_id: &str) -> Result<(), ClientError> {
        self.client
            .delete::<Value>(&environment_path(environment_id, &format!("networks/{network_id}")))?;
        Ok(())
    }

    pub fn prune(&self, environment_id: &str) -> Result<NetworkPruneReport, ClientError> {
        let resp: ApiResponse<NetworkPruneReport> = self
            .client
            .post_empty(&environment_path(environment_id, "networks/prune"))?;
        Ok(resp.data)
    }
}
