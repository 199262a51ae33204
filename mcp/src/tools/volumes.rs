use arcane_core::types::CreateVolume;
use serde::Deserialize;

use super::{environment_schema, list_schema, EnvironmentArgs, ListArgs};
use crate::registry::{InputSchema, ToolOutput, ToolRegistry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeArgs {
    environment_id: String,
    volume_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateArgs {
    environment_id: String,
    #[serde(flatten)]
    volume: CreateVolume,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowseArgs {
    environment_id: String,
    volume_name: String,
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileArgs {
    environment_id: String,
    volume_name: String,
    file_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestoreArgs {
    environment_id: String,
    volume_name: String,
    backup_id: String,
}

fn volume_schema() -> InputSchema {
    environment_schema().string("volumeName", "The volume name")
}

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        "arcane_list_volumes",
        "List Docker volumes in an environment",
        list_schema("Search filter for volume names"),
        |client, args: ListArgs| ToolOutput::json(&client.volumes().list(&args.environment_id, &args.params())?),
    );

    registry.register(
        "arcane_get_volume",
        "Get details of a specific volume",
        volume_schema(),
        |client, args: VolumeArgs| ToolOutput::json(&client.volumes().get(&args.environment_id, &args.volume_name)?),
    );

    registry.register(
        "arcane_create_volume",
        "Create a new Docker volume",
        environment_schema()
            .string("name", "The volume name")
            .optional_string("driver", "The volume driver (default: local)")
            .optional_string_map("driverOpts", "Driver options as key-value pairs")
            .optional_string_map("labels", "Labels to apply to the volume"),
        |client, args: CreateArgs| ToolOutput::json(&client.volumes().create(&args.environment_id, &args.volume)?),
    );

    registry.register(
        "arcane_remove_volume",
        "Remove a Docker volume",
        environment_schema().string("volumeName", "The volume name to remove"),
        |client, args: VolumeArgs| {
            client.volumes().remove(&args.environment_id, &args.volume_name)?;
            Ok(ToolOutput::text(format!("Volume {} removed", args.volume_name)))
        },
    );

    registry.register(
        "arcane_prune_volumes",
        "Remove all unused volumes",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.volumes().prune(&args.environment_id)?),
    );

    registry.register(
        "arcane_browse_volume",
        "Browse files and directories inside a volume",
        volume_schema().optional_string("path", "The path to browse (default: root)"),
        |client, args: BrowseArgs| {
            let entries = client
                .volumes()
                .browse(&args.environment_id, &args.volume_name, args.path.as_deref())?;
            ToolOutput::json(&entries)
        },
    );

    registry.register(
        "arcane_get_volume_file",
        "Read the content of a file inside a volume",
        volume_schema().string("filePath", "The path to the file"),
        |client, args: FileArgs| {
            let content = client
                .volumes()
                .file_content(&args.environment_id, &args.volume_name, &args.file_path)?;
            Ok(ToolOutput::text(content))
        },
    );

    registry.register(
        "arcane_get_volume_sizes",
        "Get disk usage of every volume in an environment",
        environment_schema(),
        |client, args: EnvironmentArgs| ToolOutput::json(&client.volumes().sizes(&args.environment_id)?),
    );

    registry.register(
        "arcane_list_volume_backups",
        "List backups of a volume",
        volume_schema(),
        |client, args: VolumeArgs| {
            ToolOutput::json(&client.volumes().list_backups(&args.environment_id, &args.volume_name)?)
        },
    );

    registry.register(
        "arcane_create_volume_backup",
        "Create a backup of a volume",
        volume_schema(),
        |client, args: VolumeArgs| {
            ToolOutput::json(&client.volumes().create_backup(&args.environment_id, &args.volume_name)?)
        },
    );

    registry.register(
        "arcane_restore_volume_backup",
        "Restore a volume from a backup",
        volume_schema().string("backupId", "The backup ID to restore"),
        |client, args: RestoreArgs| {
            client
                .volumes()
                .restore_backup(&args.environment_id, &args.volume_name, &args.backup_id)?;
            Ok(ToolOutput::text(format!(
                "Volume {} restored from backup {}",
                args.volume_name, args.backup_id
            )))
        },
    );
}
