use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub version: String,
    /// Seconds since the server started.
    pub uptime: u64,
    pub environment_count: u64,
    pub container_count: u64,
    pub image_count: u64,
    pub volume_count: u64,
    pub network_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerInfo {
    pub containers: u64,
    pub containers_running: u64,
    pub containers_stopped: u64,
    pub images: u64,
    pub mem_total: u64,
    pub operating_system: String,
    pub architecture: String,
    pub kernel_version: String,
    pub docker_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneResult {
    #[serde(default)]
    pub containers_deleted: Vec<String>,
    #[serde(default)]
    pub images_deleted: Vec<String>,
    #[serde(default)]
    pub volumes_deleted: Vec<String>,
    #[serde(default)]
    pub networks_deleted: Vec<String>,
    pub space_reclaimed: u64,
}

/// Body of `GET /api/health`. Not wrapped in the usual envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub commit: String,
    pub build_date: String,
}
