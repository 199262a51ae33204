//! The `arcane_*` tools, one module per resource.

mod containers;
mod environments;
mod images;
mod networks;
mod projects;
mod system;
mod volumes;

use arcane_core::types::PaginationParams;
use serde::Deserialize;

use crate::registry::{InputSchema, ToolRegistry};

/// Every Arcane tool.
pub fn registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    environments::register(&mut registry);
    containers::register(&mut registry);
    images::register(&mut registry);
    volumes::register(&mut registry);
    networks::register(&mut registry);
    projects::register(&mut registry);
    system::register(&mut registry);
    registry
}

const ENVIRONMENT_ID: &str = "The environment ID";

/// Arguments of tools scoped to one environment and nothing else.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvironmentArgs {
    environment_id: String,
}

/// Arguments of the per-environment list tools.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListArgs {
    environment_id: String,
    search: Option<String>,
}

impl ListArgs {
    fn params(&self) -> PaginationParams {
        match &self.search {
            Some(term) => PaginationParams::search(term.clone()),
            None => PaginationParams::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NoArgs {}

fn environment_schema() -> InputSchema {
    InputSchema::new().string("environmentId", ENVIRONMENT_ID)
}

fn list_schema(search: &str) -> InputSchema {
    environment_schema().optional_string("search", search)
}
