use super::{environment_schema, EnvironmentArgs, NoArgs};
use crate::registry::{InputSchema, ToolOutput, ToolRegistry};

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_get_system_info",
        "Get Arcane system information",
        InputSchema::new(),
        |client, _: NoArgs| ToolOutput::json(&client.system().info()?),
    );

    registry.register(
        "arcane_get_docker_info",
        "Get Docker daemon information for an environment",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.system().docker_info(&args.environment_id)?),
    );

    registry.register(
        "arcane_prune_system",
        "Remove unused containers, images, volumes and networks",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.system().prune(&args.environment_id)?),
    );

    registry.register(
        "arcane_get_health",
        "Check Arcane server health",
        InputSchema::new(),
        |client, _: NoArgs| ToolOutput::json(&client.system().health()?),
    );

    registry.register(
        "arcane_get_version",
        "Get the Arcane server version",
        InputSchema::new(),
        |client, _: NoArgs| ToolOutput::json(&client.system().version()?),
    );
}
