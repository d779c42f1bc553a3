//! Implements the `/help` command.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Display the list of all available commands
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), PrometheusError> {
    let embed = serenity::CreateEmbed::new()
        .title("📚 Prometheus — Command Guide")
        .description("Here are all available commands to navigate the Prometheus ecosystem:")
        .field(
            "📦 Archives",
            "`/present` — Present an asset from the archives\n\
             `/work` — Display a collaboration with a team\n\
             `/client` — Present a client and their work",
            false,
        )
        .field(
            "🔍 Search & List",
            "`/list-assets` — List all available assets\n\
             `/list-clients` — List all registered clients\n\
             `/list-collabs` — List all collaborations\n\
             `/search` — Search through archives (assets, clients, collaborations)",
            false,
        )
        .field(
            "ℹ️ Information",
            "`/identity` — Display Prometheus identity and purpose\n\
             `/channel` — Present an ecosystem channel\n\
             `/whois` — Display a person's profile card\n\
             `/skill` — Display the skill showcase\n\
             `/ping` — Check bot latency\n\
             `/stats` — Display bot and server statistics\n\
             `/help` — Display this command list",
            false,
        )
        .field(
            "📜 Rules & Information",
            "`/rules` — Display server rules\n\
             `/payment` — Payment methods and billing information",
            false,
        )
        .field(
            "🎫 Tickets & Community",
            "`/setup-tickets` — Configure the ticket system and send the control panel\n\
             `/finish` — Post a commission-delivered notice inside a ticket\n\
             `/credits` — Show your invite count and K-Credit balance",
            false,
        )
        .field(
            "⚙️ Administration",
            "`/pricing` — Display service and pricing information\n\
             `/com` — Set commission status (Open/Closed)\n\
             `/setup-welcome` — Configure the dynamic welcome message\n\
             `/setup-access` — Post the access-role panel\n\
             `/setup-invite-program` — Configure the invite reward program\n\
             `/member` — Inspect a member (Admin only)\n\
             `/reload` — Reload JSON files without restarting (Admin only)\n\
             `/backup` — Create a backup of all JSON files (Admin only)\n\
             `/deploytest` — Test the deployment monitoring webhook (Admin only)",
            false,
        )
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new(commands::ARCHIVIST_FOOTER))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
