//! Implements the `/ping` command.

use std::time::Instant;

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Check the bot's latency
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), PrometheusError> {
    let gateway_latency = ctx.ping().await;

    let started = Instant::now();
    let reply = ctx.say("Pinging...").await?;
    let round_trip = started.elapsed();

    let embed = serenity::CreateEmbed::new()
        .title("🏓 Pong!")
        .field(
            "⏱️ Bot latency",
            format!("{}ms", round_trip.as_millis()),
            true,
        )
        .field(
            "🌐 API latency",
            format!("{}ms", gateway_latency.as_millis()),
            true,
        )
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new("Prometheus • System Status"))
        .timestamp(serenity::Timestamp::now());

    reply
        .edit(ctx, CreateReply::default().content("").embed(embed))
        .await?;
    Ok(())
}
