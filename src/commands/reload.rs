//! Implements the `/reload` command.
//!
//! Rebuilds the catalog snapshot from disk and swaps it in atomically; a
//! handler running mid-reload keeps the snapshot it already holds.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Reload the JSON files without restarting the bot
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn reload(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let fresh = ctx.data().catalogs.reload().await;
    tracing::info!(
        "Catalogs reloaded by {}: {} assets, {} clients, {} collabs",
        ctx.author().name,
        fresh.assets.len(),
        fresh.clients.len(),
        fresh.collabs.len(),
    );

    let embed = serenity::CreateEmbed::new()
        .title("✅ Data reloaded")
        .description("All JSON files were reloaded successfully.")
        .field("📦 Assets", fresh.assets.len().to_string(), true)
        .field("💼 Clients", fresh.clients.len().to_string(), true)
        .field("🤝 Collabs", fresh.collabs.len().to_string(), true)
        .field("📚 Channels", fresh.channels.len().to_string(), true)
        .field("👤 Identities", fresh.identities.len().to_string(), true)
        .color(commands::GREEN)
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
