//! Implements the `/work` command.
//!
//! Showcases a collaboration: posts the partner server's invite first so
//! Discord renders its preview, then the contribution embed.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// Showcase a collaboration project
#[instrument(skip(ctx, preview, video))]
#[poise::command(slash_command, guild_only)]
pub async fn work(
    ctx: Context<'_>,
    #[description = "ID of the collaborative project"]
    #[autocomplete = "commands::autocomplete_collab"]
    asset: String,
    #[description = "Image/GIF of your work"] preview: Option<serenity::Attachment>,
    #[description = "Video of your contribution"] video: Option<serenity::Attachment>,
) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let item = catalogs
        .collabs
        .get(&asset)
        .ok_or_else(|| UserError::UnknownCollab(asset.clone()))?;

    // 1) trigger the Discord invite preview
    ctx.say(item.discord.clone()).await?;

    // 2) send the embed
    let contribution = item
        .contribution
        .split(',')
        .map(|x| format!("• {}", x.trim()))
        .join("\n");

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("🤝 {} [Work with]", item.name.to_uppercase()))
        .description(format!("✨ {}\n\n---\n\n", item.description))
        .field("🛠️ What I worked on", format!("{contribution}\n"), false)
        .color(commands::COLLAB_GREEN)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Work with external teams",
        ))
        .timestamp(serenity::Timestamp::now());

    let mut reply = CreateReply::default();

    match (item.preview.as_deref(), &preview) {
        (Some("attachment"), Some(attachment)) => {
            embed = embed.image(attachment.url.clone());
        }
        (Some(url), _) if url.starts_with("http") => {
            embed = embed.image(url);
        }
        _ => {}
    }

    match (item.video.as_deref(), &video) {
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
