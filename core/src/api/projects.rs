use serde_json::Value;

use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, CreateProject, PaginationParams, ProjectDetails, ProjectStatusCounts, ProjectSummary,
    UpdateProject,
};

/// `/api/environments/{env}/projects` (Docker Compose stacks)
#[derive(Debug, Clone, Copy)]
pub struct ProjectsApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> ProjectsApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, environment_id: &str, params: &PaginationParams) -> Result<Vec<ProjectSummary>, ClientError> {
        let resp: ApiResponse<Vec<ProjectSummary>> = self
            .client
            .get_with_params(&environment_path(environment_id, "projects"), params)?;
        Ok(resp.data)
    }

    pub fn get(&self, environment_id: &str, project_id: &str) -> Result<ProjectDetails, ClientError> {
        let resp: ApiResponse<ProjectDetails> = self.client.get(&project_path(environment_id, project_id))?;
        Ok(resp.data)
    }

    pub fn create(&self, environment_id: &str, input: &CreateProject) -> Result<ProjectDetails, ClientError> {
        let resp: ApiResponse<ProjectDetails> = self
            .client
            .post(&environment_path(environment_id, "projects"), input)?;
        Ok(resp.data)
    }

    pub fn update(&self, environment_id: &str, project_id: &str, input: &UpdateProject) -> Result<ProjectDetails, ClientError> {
        let resp: ApiResponse<ProjectDetails> = self.client.put(&project_path(environment_id, project_id), input)?;
        Ok(resp.data)
    }

    pub fn delete(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.client.delete::<Value>(&project_path(environment_id, project_id))?;
        Ok(())
    }

    /// `docker compose up`
    pub fn deploy(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, project_id, "deploy")
    }

    /// `docker compose down`
    pub fn stop(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, project_id, "stop")
    }

    pub fn restart(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, project_id, "restart")
    }

    pub fn redeploy(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, project_id, "redeploy")
    }

    pub fn pull_images(&self, environment_id: &str, project_id: &str) -> Result<(), ClientError> {
        self.action(environment_id, project_id, "pull")
    }

    pub fn counts(&self, environment_id: &str) -> Result<ProjectStatusCounts, ClientError> {
        let resp: ApiResponse<ProjectStatusCounts> =
            self.client.get(&environment_path(environment_id, "projects/counts"))?;
        Ok(resp.data)
    }

    fn action(&self, environment_id: &str, project_id: &str, action: &str) -> Result<(), ClientError> {
        let path = format!("{}/{action}", project_path(environment_id, project_id));
        self.client.post_empty::<Value>(&path)?;
        Ok(())
    }
}

fn project_path(environment_id: &str, project_id: &str) -> String {
    environment_path(environment_id, &format!("projects/{project_id}"))
}
