use serde_json::Value;

use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, ConnectionTest, CreateEnvironment, Environment, PaginationParams, UpdateEnvironment,
};

const BASE: &str = "/api/environments";

/// `/api/environments`
#[derive(Debug, Clone, Copy)]
pub struct EnvironmentsApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> EnvironmentsApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, params: &PaginationParams) -> Result<Vec<Environment>, ClientError> {
        let resp: ApiResponse<Vec<Environment>> = self.client.get_with_params(BASE, params)?;
        Ok(resp.data)
    }

    pub fn get(&self, id: &str) -> Result<Environment, ClientError> {
        let resp: ApiResponse<Environment> = self.client.get(&format!("{BASE}/{id}"))?;
        Ok(resp.data)
    }

    pub fn create(&self, input: &CreateEnvironment) -> Result<Environment, ClientError> {
        let resp: ApiResponse<Environment> = self.client.post(BASE, input)?;
        Ok(resp.data)
    }

    pub fn update(&self, id: &str, input: &UpdateEnvironment) -> Result<Environment, ClientError> {
        let resp: ApiResponse<Environment> = self.client.put(&format!("{BASE}/{id}"), input)?;
        Ok(resp.data)
    }

    pub fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete::<Value>(&format!("{BASE}/{id}"))?;
        Ok(())
    }

    /// Ask the server to reach the environment's Docker endpoint.
    pub fn test_connection(&self, id: &str) -> Result<ConnectionTest, ClientError> {
        let resp: ApiResponse<ConnectionTest> = self.client.post_empty(&format!("{BASE}/{id}/test"))?;
        Ok(resp.data)
    }
}
