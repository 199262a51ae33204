//! Payloads exchanged with the Arcane API.
//!
//! # Design
//! Field names follow the server's camelCase JSON. Request types skip unset
//! optional fields so the server applies its own defaults. Response enums
//! carry an `Unknown` catch-all so a newer server adding a state does not
//! break decoding.

mod common;
mod container;
mod environment;
mod image;
mod network;
mod project;
mod system;
mod volume;

pub use common::{ApiResponse, MessageResponse, Pagination, PaginationParams, SortOrder};
pub use container::{
    ContainerDetails, ContainerState, ContainerStatusCounts, ContainerSummary, CreateContainer, Mount,
    MountType, PortMapping, Protocol, RestartPolicy, VolumeMount,
};
pub use environment::{ConnectionTest, CreateEnvironment, Environment, EnvironmentStatus, UpdateEnvironment};
pub use image::{ImageCounts, ImageDetails, ImagePruneReport, ImageSummary, PullImageOptions};
pub use network::{CreateNetwork, NetworkContainer, NetworkDetails, NetworkPruneReport, NetworkSummary};
pub use project::{
    CreateProject, ProjectDetails, ProjectService, ProjectStatus, ProjectStatusCounts, ProjectSummary,
    UpdateProject,
};
pub use system::{DockerInfo, HealthStatus, PruneResult, SystemInfo, VersionInfo};
pub use volume::{
    BackupStatus, CreateVolume, FileEntry, VolumeBackup, VolumeDetails, VolumePruneReport, VolumeSummary,
    VolumeUsage,
};
