use arcane_core::types::CreateNetwork;
use serde::Deserialize;

use super::{environment_schema, list_schema, EnvironmentArgs, ListArgs};
use crate::registry::{ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkArgs {
    environment_id: String,
    network_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    environment_id: String,
    #[serde(flatten)]
    network: CreateNetwork,
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_networks",
        "List Docker networks in an environment",
        list_schema("Search filter for network name"),
        |client, args: ListArgs| ToolOutput::json(&client.networks().list(&args.environment_id, &args.params())?),
    );

    registry.register(
        "arcane_get_network",
        "Get details of a specific network",
        environment_schema().string("networkId", "The network ID"),
        |client, args: NetworkArgs| ToolOutput::json(&client.networks().get(&args.environment_id, &args.network_id)?),
    );

    registry.register(
        "arcane_create_network",
        "Create a new Docker network",
        environment_schema()
            .string("name", "The network name")
            .optional_string("driver", "Network driver (e.g., bridge, overlay)")
            .optional_string("subnet", "Subnet CIDR (e.g., 172.20.0.0/16)")
            .optional_string("gateway", "Gateway IP address")
            .optional_string_map("labels", "Labels to apply to the network"),
        |client, args: CreateArgs| ToolOutput::json(&client.networks().create(&args.environment_id, &args.network)?),
    );

    registry.register(
        "arcane_remove_network",
        "Remove a Docker network",
        environment_schema().string("networkId", "The network ID"),
        |client, args: NetworkArgs| {
            client.networks().remove(&args.environment_id, &args.network_id)?;
            Ok(ToolOutput::text(format!("Network {} removed", args.network_id)))
        },
    );

    registry.register(
        "arcane_prune_networks",
        "Remove all unused networks",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.networks().prune(&args.environment_id)?),
    );
}
