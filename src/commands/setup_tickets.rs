//! Implements the `/setup-tickets` command.

use tracing::instrument;

use crate::commands;
use crate::data::tickets::TicketConfig;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::tickets;
use crate::Context;

/// Set up the ticket system and send the control panel
#[instrument(skip(ctx))]
#[poise::command(
    slash_command,
    guild_only,
    rename = "setup-tickets",
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup_tickets(
    ctx: Context<'_>,
    #[description = "The category where new tickets will be created"]
    #[channel_types("Category")]
    category: serenity::GuildChannel,
    #[description = "The role that will have access to tickets"]
    support_role: serenity::Role,
    #[description = "The channel where ticket transcripts will be sent"]
    #[channel_types("Text")]
    log_channel: Option<serenity::GuildChannel>,
) -> Result<(), PrometheusError> {
    // When a setup channel is pinned in the config, insist on it.
    let settings = ctx.data().settings.get().await;
    if let Some(expected) = settings.channels.setup_tickets {
        if ctx.channel_id() != expected {
            return Err(UserError::WrongChannel(expected).into());
        }
    }

    if category.kind != serenity::ChannelType::Category {
        return Err(UserError::TicketCategoryMisconfigured.into());
    }

    ctx.data()
        .tickets
        .set(TicketConfig {
            category_id: category.id,
            support_role_id: support_role.id,
            log_channel_id: log_channel.map(|c| c.id),
        })
        .await?;

    let panel = serenity::CreateEmbed::new()
        .title("Kentiq Support")
        .description("Click the button below to open a ticket and get help.")
        .color(commands::GREEN)
        .footer(serenity::CreateEmbedFooter::new(
            "You can only have one ticket open at a time.",
        ));

    let button_row = serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(
        tickets::CREATE_TICKET,
    )
    .label("Create Ticket")
    .style(serenity::ButtonStyle::Success)]);

    let message = serenity::CreateMessage::new()
        .embed(panel)
        .components(vec![button_row]);
    ctx.channel_id().send_message(ctx, message).await?;

    ctx.send(
        poise::CreateReply::default()
            .content("The ticket panel has been configured successfully!")
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
