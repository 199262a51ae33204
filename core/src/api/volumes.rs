use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::environment_path;
use crate::client::ArcaneClient;
use crate::error::ClientError;
use crate::query::encode_segment;
use crate::types::{
    ApiResponse, CreateVolume, FileEntry, PaginationParams, VolumeBackup, VolumeDetails, VolumePruneReport,
    VolumeSummary,
};

#[derive(Serialize)]
struct PathQuery<'p> {
    path: Option<&'p str>,
}

/// `/api/environments/{env}/volumes`
///
/// Volume names are percent-encoded as a single path segment.
#[derive(Debug, Clone, Copy)]
pub struct VolumesApi<'a> {
    client: &'a ArcaneClient,
}

impl<'a> VolumesApi<'a> {
    pub fn new(client: &'a ArcaneClient) -> Self {
        Self { client }
    }

    pub fn list(&self, environment_id: &str, params: &PaginationParams) -> Result<Vec<VolumeSummary>, ClientError> {
        let resp: ApiResponse<Vec<VolumeSummary>> = self
            .client
            .get_with_params(&environment_path(environment_id, "volumes"), params)?;
        Ok(resp.data)
    }

    pub fn get(&self, environment_id: &str, volume_name: &str) -> Result<VolumeDetails, ClientError> {
        let resp: ApiResponse<VolumeDetails> = self.client.get(&volume_path(environment_id, volume_name))?;
        Ok(resp.data)
    }

    pub fn create(&self, environment_id: &str, input: &CreateVolume) -> Result<VolumeDetails, ClientError> {
        let resp: ApiResponse<VolumeDetails> = self
            .client
            .post(&environment_path(environment_id, "volumes"), input)?;
        Ok(resp.data)
    }

    pub fn remove(&self, environment_id: &str, volume_name: &str) -> Result<(), ClientError> {
        self.client.delete::<Value>(&volume_path(environment_id, volume_name))?;
        Ok(())
    }

    pub fn prune(&self, environment_id: &str) -> Result<VolumePruneReport, ClientError> {
        let resp: ApiResponse<VolumePruneReport> = self
            .client
            .post_empty(&environment_path(environment_id, "volumes/prune"))?;
        Ok(resp.data)
    }

    /// List files under `path` inside the volume (the root when `None`).
    pub fn browse(&self, environment_id: &str, volume_name: &str, path: Option<&str>) -> Result<Vec<FileEntry>, ClientError> {
        let url = format!("{}/browse", volume_path(environment_id, volume_name));
        let resp: ApiResponse<Vec<FileEntry>> = self.client.get_with_params(&url, &PathQuery { path })?;
        Ok(resp.data)
    }

    pub fn file_content(&self, environment_id: &str, volume_name: &str, file_path: &str) -> Result<String, ClientError> {
        let url = format!("{}/file", volume_path(environment_id, volume_name));
        let resp: ApiResponse<String> = self
            .client
            .get_with_params(&url, &PathQuery { path: Some(file_path) })?;
        Ok(resp.data)
    }

    /// Disk usage in bytes keyed by volume name.
    pub fn sizes(&self, environment_id: &str) -> Result<BTreeMap<String, u64>, ClientError> {
        let resp: ApiResponse<BTreeMap<String, u64>> =
            self.client.get(&environment_path(environment_id, "volumes/sizes"))?;
        Ok(resp.data)
    }

    pub fn list_backups(&self, environment_id: &str, volume_name: &str) -> Result<Vec<VolumeBackup>, ClientError> {
        let url = format!("{}/backups", volume_path(environment_id, volume_name));
        let resp: ApiResponse<Vec<VolumeBackup>> = self.client.get(&url)?;
        Ok(resp.data)
    }

    pub fn create_backup(&self, environment_id: &str, volume_name: &str) -> Result<VolumeBackup, ClientError> {
        let url = format!("{}/backups", volume_path(environment_id, volume_name));
        let resp: ApiResponse<VolumeBackup> = self.client.post_empty(&url)?;
        Ok(resp.data)
    }

    pub fn restore_backup(&self, environment_id: &str, volume_name: &str, backup_id: &str) -> Result<(), ClientError> {
        let url = format!(
            "{}/backups/{backup_id}/restore",
            volume_path(environment_id, volume_name)
        );
        self.client.post_empty::<Value>(&url)?;
        Ok(())
    }
}

fn volume_path(environment_id: &str, volume_name: &str) -> String {
    environment_path(environment_id, &format!("volumes/{}", encode_segment(volume_name)))
}
