//! Typed views over the Arcane REST resources.
//!
//! Each view borrows an `ArcaneClient`, builds the resource path, and
//! unwraps the `data` field of the response envelope. Auth, error mapping
//! and streaming all happen in the client.

mod containers;
mod environments;
mod images;
mod networks;
mod projects;
mod system;
mod volumes;

pub use containers::ContainersApi;
pub use environments::EnvironmentsApi;
pub use images::ImagesApi;
pub use networks::NetworksApi;
pub use projects::ProjectsApi;
pub use system::SystemApi;
pub use volumes::VolumesApi;

use crate::client::ArcaneClient;

impl ArcaneClient {
    pub fn environments(&self) -> EnvironmentsApi<'_> {
        EnvironmentsApi::new(self)
    }

    pub fn containers(&self) -> ContainersApi<'_> {
        ContainersApi::new(self)
    }

    pub fn images(&self) -> ImagesApi<'_> {
        ImagesApi::new(self)
    }

    pub fn volumes(&self) -> VolumesApi<'_> {
        VolumesApi::new(self)
    }

    pub fn networks(&self) -> NetworksApi<'_> {
        NetworksApi::new(self)
    }

    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    pub fn system(&self) -> SystemApi<'_> {
        SystemApi::new(self)
    }
}

/// `/api/environments/{environment_id}/{resource}`
fn environment_path(environment_id: &str, resource: &str) -> String {
    format!("/api/environments/{environment_id}/{resource}")
}
