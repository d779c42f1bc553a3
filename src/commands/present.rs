//! Implements the `/present` command.
//!
//! Prometheus presents an asset from the archives as a rich embed, with
//! optional preview and video attachments.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// Prometheus presents an asset
#[instrument(skip(ctx, preview, video))]
#[poise::command(slash_command, guild_only)]
pub async fn present(
    ctx: Context<'_>,
    #[description = "ID of the asset to present"]
    #[autocomplete = "commands::autocomplete_asset"]
    asset: String,
    #[description = "Image/GIF preview"] preview: Option<serenity::Attachment>,
    #[description = "Video file"] video: Option<serenity::Attachment>,
) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let entry = catalogs
        .assets
        .get(&asset)
        .ok_or_else(|| UserError::UnknownAsset(asset.clone()))?;

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("📦 {} [{}]", entry.name.to_uppercase(), entry.kind))
        .description(format!("✨ {}\n\n---\n\n", entry.description))
        .field(
            "📦 Technical details",
            format!(
                "• **Format:** `{}`\n• **Status:** `{}`\n• **Version:** `{}`\n",
                entry.format, entry.status, entry.version
            ),
            false,
        )
        .field("🧷 License", entry.license.clone(), true)
        .field("👤 Author", entry.author.clone(), true)
        .field("📅 Date", entry.date.clone(), true)
        .color(entry.color.unwrap_or(commands::CYAN))
        .footer(serenity::CreateEmbedFooter::new(commands::ARCHIVIST_FOOTER))
        .timestamp(serenity::Timestamp::now());

    if entry.is_model() {
        for (name, value) in [
            ("🎨 Polycount", &entry.polycount),
            ("🦴 Rig", &entry.rig),
            ("🏃 Animation", &entry.animation),
            ("💻 Software", &entry.software),
        ] {
            if let Some(value) = value {
                embed = embed.field(name, format!("`{value}`"), true);
            }
        }
    }

    let mut reply = CreateReply::default();

    match (entry.preview.as_deref(), &preview) {
        (Some("attachment"), Some(attachment)) => {
            embed = embed.image(attachment.url.clone());
        }
        (Some(url), _) if url.starts_with("http") => {
            embed = embed.image(url);
        }
        _ => {}
    }

    match (entry.video.as_deref(), &video) {
        (Some("attachment"), Some(attachment)) => {
            let file = serenity::CreateAttachment::url(ctx.http(), &attachment.url).await?;
            reply = reply.attachment(file);
        }
        (Some(url), _) if url.starts_with("http") => {
            embed = embed.field("🎬 Video", format!("[External link]({url})"), false);
        }
        _ => {}
    }

    ctx.send(reply.embed(embed)).await?;
    Ok(())
}
