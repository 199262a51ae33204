use arcane_core::types::{CreateEnvironment, PaginationParams, UpdateEnvironment};
use serde::Deserialize;

use crate::registry::{InputSchema, ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
struct SearchArgs {
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdArgs {
    id: String,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    id: String,
    #[serde(flatten)]
    changes: UpdateEnvironment,
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_environments",
        "List all Docker environments managed by Arcane.",
        InputSchema::new().optional_string("search", "Search term to filter environments by name or description"),
        |client, args: SearchArgs| {
            let params = args.search.map(PaginationParams::search).unwrap_or_default();
            ToolOutput::json(&client.environments().list(&params)?)
        },
    );

    registry.register(
        "arcane_get_environment",
        "Get details of a specific environment by ID.",
        InputSchema::new().string("id", "The unique identifier of the environment"),
        |client, args: IdArgs| ToolOutput::json(&client.environments().get(&args.id)?),
    );

    registry.register(
        "arcane_create_environment",
        "Create a new Docker environment.",
        InputSchema::new()
            .string("name", "Name of the environment")
            .optional_string("description", "Description of the environment")
            .string("url", "URL endpoint for the environment"),
        |client, args: CreateEnvironment| ToolOutput::json(&client.environments().create(&args)?),
    );

    registry.register(
        "arcane_update_environment",
        "Update an existing environment.",
        InputSchema::new()
            .string("id", "The unique identifier of the environment to update")
            .optional_string("name", "New name for the environment")
            .optional_string("description", "New description for the environment")
            .optional_string("url", "New URL endpoint for the environment"),
        |client, args: UpdateArgs| ToolOutput::json(&client.environments().update(&args.id, &args.changes)?),
    );

    registry.register(
        "arcane_delete_environment",
        "Delete an environment by ID.",
        InputSchema::new().string("id", "The unique identifier of the environment to delete"),
        |client, args: IdArgs| {
            client.environments().delete(&args.id)?;
            Ok(ToolOutput::text(format!("Environment {} deleted successfully", args.id)))
        },
    );

    registry.register(
        "arcane_test_environment",
        "Test the connection to an environment.",
        InputSchema::new().string("id", "The unique identifier of the environment to test"),
        |client, args: IdArgs| ToolOutput::json(&client.environments().test_connection(&args.id)?),
    );
}
