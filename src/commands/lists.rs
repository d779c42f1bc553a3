//! Implements the `/list-assets`, `/list-clients` and `/list-collabs`
//! commands: ephemeral index views over the archives.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Embed descriptions cap out at 4096; the original kept lists under 2000.
const MAX_LIST_LENGTH: usize = 2000;

/// List all available assets in the archives
#[instrument(skip(ctx))]
#[poise::command(slash_command, rename = "list-assets")]
pub async fn list_assets(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let list = catalogs
        .assets
        .iter()
        .map(|(id, asset)| format!("• **{id}** — {} [{}]", asset.name, asset.kind))
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title(format!("📦 Asset list ({})", catalogs.assets.len()))
        .description(clamp_list(list, "*No assets found.*"))
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new("Prometheus • Asset Archive"))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List all registered clients
#[instrument(skip(ctx))]
#[poise::command(slash_command, rename = "list-clients")]
pub async fn list_clients(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let list = catalogs
        .clients
        .iter()
        .map(|(id, client)| format!("• **{id}** — {} ({})", client.name, client.role))
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title(format!("💼 Client list ({})", catalogs.clients.len()))
        .description(clamp_list(list, "*No clients found.*"))
        .color(commands::BLUE)
        .footer(serenity::CreateEmbedFooter::new("Prometheus • Client Archive"))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// List all collaborations
#[instrument(skip(ctx))]
#[poise::command(slash_command, rename = "list-collabs")]
pub async fn list_collabs(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let list = catalogs
        .collabs
        .iter()
        .map(|(id, collab)| format!("• **{id}** — {}", collab.name))
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title(format!("🤝 Collaboration list ({})", catalogs.collabs.len()))
        .description(clamp_list(list, "*No collaborations found.*"))
        .color(commands::COLLAB_GREEN)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Collaboration Archive",
        ))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Ellipsize over-long lists; substitute the fallback for empty ones.
fn clamp_list(list: String, fallback: &str) -> String {
    if list.is_empty() {
        return fallback.to_string();
    }
    if list.chars().count() > MAX_LIST_LENGTH {
        let clipped: String = list.chars().take(MAX_LIST_LENGTH - 3).collect();
        format!("{clipped}...")
    } else {
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lists_show_the_fallback() {
        assert_eq!(clamp_list(String::new(), "*none*"), "*none*");
    }

    #[test]
    fn long_lists_are_ellipsized_within_the_cap() {
        let long = "x".repeat(MAX_LIST_LENGTH + 100);
        let clamped = clamp_list(long, "*none*");
        assert_eq!(clamped.chars().count(), MAX_LIST_LENGTH);
        assert!(clamped.ends_with("..."));
    }
}
