use arcane_core::types::{CreateProject, UpdateProject};
use serde::Deserialize;

use super::{environment_schema, list_schema, EnvironmentArgs, ListArgs};
use crate::registry::{InputSchema, ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectArgs {
    environment_id: String,
    project_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    environment_id: String,
    name: String,
    compose_file: String,
    git_repo_id: Option<String>,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateArgs {
    environment_id: String,
    project_id: String,
    #[serde(flatten)]
    changes: UpdateProject,
}

fn project_schema() -> InputSchema {
    environment_schema().string("projectId", "The project ID")
}

/// Register a lifecycle action (`deploy`, `stop`, ...) that only reports
/// success.
fn register_action(
    registry: &mut ToolRegistry,
    name: &'static str,
    description: &'static str,
    past_tense: &'static str,
    run: fn(&arcane_core::api::ProjectsApi<'_>, &str, &str) -> Result<(), arcane_core::ClientError>,
) {
    registry.register(name, description, project_schema(), move |client, args: ProjectArgs| {
        run(&client.projects(), &args.environment_id, &args.project_id)?;
        Ok(ToolOutput::text(format!("Project {} {past_tense}", args.project_id)))
    });
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_projects",
        "List Docker Compose projects in an environment",
        list_schema("Search filter for project name"),
        |client, args: ListArgs| ToolOutput::json(&client.projects().list(&args.environment_id, &args.params())?),
    );

    registry.register(
        "arcane_get_project",
        "Get details of a specific project, including its compose file",
        project_schema(),
        |client, args: ProjectArgs| ToolOutput::json(&client.projects().get(&args.environment_id, &args.project_id)?),
    );

    registry.register(
        "arcane_create_project",
        "Create a new Docker Compose project",
        environment_schema()
            .string("name", "The project name")
            .string("composeFile", "Contents of docker-compose.yml")
            .optional_string("gitRepoId", "Git repository to source the project from")
            .optional_string("path", "Path of the compose file inside the repository"),
        |client, args: CreateArgs| {
            let project = CreateProject {
                name: args.name,
                environment_id: args.environment_id.clone(),
                compose_file: args.compose_file,
                git_repo_id: args.git_repo_id,
                path: args.path,
            };
            ToolOutput::json(&client.projects().create(&args.environment_id, &project)?)
        },
    );

    registry.register(
        "arcane_update_project",
        "Update a project's name or compose file",
        project_schema()
            .optional_string("name", "New project name")
            .optional_string("composeFile", "New contents of docker-compose.yml")
            .optional_string("gitRepoId", "Git repository to source the project from")
            .optional_string("path", "Path of the compose file inside the repository"),
        |client, args: UpdateArgs| {
            ToolOutput::json(&client.projects().update(&args.environment_id, &args.project_id, &args.changes)?)
        },
    );

    registry.register(
        "arcane_delete_project",
        "Delete a project",
        project_schema(),
        |client, args: ProjectArgs| {
            client.projects().delete(&args.environment_id, &args.project_id)?;
            Ok(ToolOutput::text(format!("Project {} deleted", args.project_id)))
        },
    );

    register_action(
        registry,
        "arcane_deploy_project",
        "Deploy (docker compose up) a project",
        "deployed",
        |api, env, id| api.deploy(env, id),
    );
    register_action(
        registry,
        "arcane_stop_project",
        "Stop (docker compose down) a project",
        "stopped",
        |api, env, id| api.stop(env, id),
    );
    register_action(
        registry,
        "arcane_restart_project",
        "Restart a project's services",
        "restarted",
        |api, env, id| api.restart(env, id),
    );
    register_action(
        registry,
        "arcane_redeploy_project",
        "Pull images and redeploy a project",
        "redeployed",
        |api, env, id| api.redeploy(env, id),
    );
    register_action(
        registry,
        "arcane_pull_project_images",
        "Pull the images used by a project",
        "images pulled",
        |api, env, id| api.pull_images(env, id),
    );

    registry.register(
        "arcane_get_project_counts",
        "Get project status counts for an environment",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.projects().counts(&args.environment_id)?),
    );
}
