//! Implements the `/channel` command.

use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// Present a channel of the ecosystem
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Channel to present"]
    #[autocomplete = "commands::autocomplete_channel_entry"]
    name: String,
) -> Result<(), PrometheusError> {
    let catalogs = ctx.data().catalogs.get().await;
    let entry = catalogs
        .channels
        .get(&name)
        .ok_or_else(|| UserError::UnknownChannelEntry(name.clone()))?;

    let embed = serenity::CreateEmbed::new()
        .title(entry.title.clone())
        .description(entry.description.clone())
        .color(entry.color);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
