//! Implements the `/finish` command: the support role posts a delivery
//! notice inside a ticket, nudging the close flow.

use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::tickets;
use crate::Context;

/// Mark the commission in this ticket as delivered
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn finish(
    ctx: Context<'_>,
    #[description = "Optional delivery note"] note: Option<String>,
) -> Result<(), PrometheusError> {
    let config = ctx
        .data()
        .tickets
        .get()
        .await
        .ok_or(UserError::TicketsNotConfigured)?;

    let is_support = ctx
        .author_member()
        .await
        .is_some_and(|m| m.roles.contains(&config.support_role_id));
    if !is_support {
        return Err(UserError::NotSupportRole.into());
    }

    let channel_name = ctx.channel_id().name(ctx).await?;
    if !tickets::is_ticket_channel(&channel_name) {
        return Err(UserError::NotATicketChannel.into());
    }

    let mut embed = serenity::CreateEmbed::new()
        .title("📦 Commission delivered")
        .description(
            "This commission has been marked as delivered. Please review the \
             deliverables; once everything checks out, support will close the ticket \
             with the button above.",
        )
        .color(commands::GREEN)
        .footer(serenity::CreateEmbedFooter::new("Prometheus • Tickets"))
        .timestamp(serenity::Timestamp::now());
    if let Some(note) = note {
        embed = embed.field("Delivery note", note, false);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
