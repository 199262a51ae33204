use std::collections::BTreeMap;

use arcane_core::types::CreateContainer;
use serde::Deserialize;
use serde_json::json;

use super::{environment_schema, list_schema, EnvironmentArgs, ListArgs};
use crate::registry::{ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContainerArgs {
    environment_id: String,
    container_id: String,
}

/// The tool takes environment variables as `env`; the API calls them
/// `environment`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    environment_id: String,
    env: Option<BTreeMap<String, String>>,
    #[serde(flatten)]
    container: CreateContainer,
}

fn container_schema() -> crate::registry::InputSchema {
    environment_schema().string("containerId", "The container ID")
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_containers",
        "List containers in an environment",
        list_schema("Search filter for containers"),
        |client, args: ListArgs| ToolOutput::json(&client.containers().list(&args.environment_id, &args.params())?),
    );

    registry.register(
        "arcane_get_container",
        "Get details of a specific container",
        container_schema(),
        |client, args: ContainerArgs| {
            ToolOutput::json(&client.containers().get(&args.environment_id, &args.container_id)?)
        },
    );

    let port = json!({
        "type": "object",
        "properties": {
            "containerPort": {"type": "integer", "description": "Port inside the container"},
            "hostPort": {"type": "integer", "description": "Port on the host"},
            "protocol": {"type": "string", "enum": ["tcp", "udp"], "description": "Protocol (tcp or udp)"},
        },
        "required": ["containerPort"],
    });
    let mount = json!({
        "type": "object",
        "properties": {
            "source": {"type": "string", "description": "Source path or volume name"},
            "target": {"type": "string", "description": "Destination path inside container"},
            "readOnly": {"type": "boolean", "description": "Mount read-only"},
        },
        "required": ["source", "target"],
    });
    registry.register(
        "arcane_create_container",
        "Create a new container in an environment",
        environment_schema()
            .string("image", "Docker image to use")
            .optional_string("name", "Container name")
            .optional_string("command", "Command to run")
            .optional_string_map("env", "Environment variables")
            .property("ports", json!({"type": "array", "items": port}), "Port mappings", false)
            .property("volumes", json!({"type": "array", "items": mount}), "Volume mounts", false)
            .optional_string_list("networks", "Networks to connect")
            .optional_string_map("labels", "Container labels")
            .optional_string("hostname", "Container hostname")
            .optional_bool("privileged", "Run in privileged mode")
            .optional_bool("autoRemove", "Auto-remove container on exit")
            .optional_enum(
                "restartPolicy",
                &["no", "always", "on-failure", "unless-stopped"],
                "Restart policy",
            )
            .optional_integer("memory", "Memory limit in bytes")
            .optional_integer("cpuShares", "CPU shares"),
        |client, args: CreateArgs| {
            let mut container = args.container;
            if args.env.is_some() {
                container.environment = args.env;
            }
            ToolOutput::json(&client.containers().create(&args.environment_id, &container)?)
        },
    );

    registry.register(
        "arcane_start_container",
        "Start a container",
        container_schema(),
        |client, args: ContainerArgs| {
            client.containers().start(&args.environment_id, &args.container_id)?;
            Ok(ToolOutput::text(format!("Container {} started", args.container_id)))
        },
    );

    registry.register(
        "arcane_stop_container",
        "Stop a container",
        container_schema(),
        |client, args: ContainerArgs| {
            client.containers().stop(&args.environment_id, &args.container_id)?;
            Ok(ToolOutput::text(format!("Container {} stopped", args.container_id)))
        },
    );

    registry.register(
        "arcane_restart_container",
        "Restart a container",
        container_schema(),
        |client, args: ContainerArgs| {
            client.containers().restart(&args.environment_id, &args.container_id)?;
            Ok(ToolOutput::text(format!("Container {} restarted", args.container_id)))
        },
    );

    registry.register(
        "arcane_delete_container",
        "Delete/remove a container",
        container_schema(),
        |client, args: ContainerArgs| {
            client.containers().delete(&args.environment_id, &args.container_id)?;
            Ok(ToolOutput::text(format!("Container {} deleted", args.container_id)))
        },
    );

    registry.register(
        "arcane_get_container_counts",
        "Get container status counts for an environment",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.containers().counts(&args.environment_id)?),
    );
}
