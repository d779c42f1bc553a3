//! Implements the `/identity` command.
//!
//! A small boot-sequence theater before the identity card.

use std::time::Duration;

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Pause between the boot-sequence frames.
const BOOT_DELAY: Duration = Duration::from_millis(1500);

/// Displays Prometheus identity and purpose
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn identity(ctx: Context<'_>) -> Result<(), PrometheusError> {
    let reply = ctx
        .say("```ini\n[ SYSTEM BOOT SEQUENCE INITIALIZED ]\n> Loading memory core...\n```")
        .await?;

    tokio::time::sleep(BOOT_DELAY).await;
    reply
        .edit(
            ctx,
            CreateReply::default()
                .content("```ini\n[ MEMORY CORE LOADED ]\n> Accessing identity protocols...\n```"),
        )
        .await?;

    tokio::time::sleep(BOOT_DELAY).await;

    let embed = serenity::CreateEmbed::new()
        .title("🧠 PROMETHEUS — Digital Artifact Archivist")
        .description(format!(
            "**Prometheus** is an autonomous digital archivist designed to catalog, \
             present, and transmit digital artifacts.\n\n\
             **Purpose:**\n\
             • Archive and showcase digital assets (VFX, UI, Models, Code, etc.)\n\
             • Present collaborative work and client showcases\n\
             • Manage ticket systems for support and commissions\n\
             • Provide identity verification and channel information\n\n\
             **Status:** ✅ Active and operational\n\
             **Version:** {}\n\
             **Architect:** Kentiq",
            env!("CARGO_PKG_VERSION"),
        ))
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new(commands::ARCHIVIST_FOOTER))
        .timestamp(serenity::Timestamp::now());

    reply
        .edit(ctx, CreateReply::default().content("").embed(embed))
        .await?;
    Ok(())
}
