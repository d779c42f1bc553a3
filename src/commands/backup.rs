//! Implements the `/backup` command.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Create a backup of all JSON files
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn backup(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let (stamp, files) = ctx.data().catalogs.backup().await?;

    let listed = if files.is_empty() {
        "None".to_string()
    } else {
        files.iter().map(|f| format!("• {f}")).join("\n")
    };

    let embed = serenity::CreateEmbed::new()
        .title("💾 Backup created")
        .description("Backup created successfully in the `backups/` directory.")
        .field("📁 Files backed up", listed, false)
        .field("🕐 Timestamp", stamp.to_string(), false)
        .color(commands::GREEN)
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
