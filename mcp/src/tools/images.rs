use arcane_core::types::PullImageOptions;
use serde::Deserialize;

use super::{environment_schema, list_schema, EnvironmentArgs, ListArgs};
use crate::registry::{ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageArgs {
    environment_id: String,
    image_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullArgs {
    environment_id: String,
    #[serde(flatten)]
    options: PullImageOptions,
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_images",
        "List Docker images in an environment",
        list_schema("Search filter for images"),
        |client, args: ListArgs| ToolOutput::json(&client.images().list(&args.environment_id, &args.params())?),
    );

    registry.register(
        "arcane_get_image",
        "Get details of a specific image",
        environment_schema().string("imageId", "The image ID"),
        |client, args: ImageArgs| ToolOutput::json(&client.images().get(&args.environment_id, &args.image_id)?),
    );

    // Blocks until the pull finishes and returns the whole progress log.
    registry.register(
        "arcane_pull_image",
        "Pull an image from a registry",
        environment_schema()
            .string("image", "The image name to pull")
            .optional_string("registry", "The registry to pull from")
            .optional_string("tag", "The image tag")
            .optional_string("platform", "The platform (e.g., linux/amd64)"),
        |client, args: PullArgs| {
            let progress = client.images().pull(&args.environment_id, &args.options)?;
            Ok(ToolOutput::text(progress.collect_text()?))
        },
    );

    registry.register(
        "arcane_remove_image",
        "Remove an image",
        environment_schema().string("imageId", "The image ID to remove"),
        |client, args: ImageArgs| {
            client.images().remove(&args.environment_id, &args.image_id)?;
            Ok(ToolOutput::text(format!("Image {} removed", args.image_id)))
        },
    );

    registry.register(
        "arcane_prune_images",
        "Remove unused images",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.images().prune(&args.environment_id)?),
    );

    registry.register(
        "arcane_get_image_counts",
        "Get image counts for an environment",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.images().counts(&args.environment_id)?),
    );
}
