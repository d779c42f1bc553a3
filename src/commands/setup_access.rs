//! Implements the `/setup-access` command.
//!
//! Posts the access panel whose button assigns the configured role, the
//! explicit replacement for the old react-to-confirm flow.

use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::events;
use crate::serenity;
use crate::Context;

/// Post the access panel and bind the role its button grants
#[instrument(skip(ctx))]
#[poise::command(
    slash_command,
    guild_only,
    rename = "setup-access",
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup_access(
    ctx: Context<'_>,
    #[description = "Role granted by the access button"] role: serenity::Role,
    #[description = "Channel to post the panel in (defaults to here)"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    ctx.data()
        .settings
        .update(|config| {
            config.access.role_id = Some(role.id);
        })
        .await?;

    let panel = serenity::CreateEmbed::new()
        .title("〚🔓〛 Server Access")
        .description(
            "Click the button below to confirm you have read the welcome message and \
             unlock the rest of the server.",
        )
        .color(commands::ACCENT)
        .footer(serenity::CreateEmbedFooter::new("Kentiq Universe • Access"));

    let button_row = serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(
        events::GRANT_ACCESS,
    )
    .label("Get Access")
    .style(serenity::ButtonStyle::Success)]);

    let target = channel.map_or_else(|| ctx.channel_id(), |c| c.id);
    let message = serenity::CreateMessage::new()
        .embed(panel)
        .components(vec![button_row]);
    target.send_message(ctx, message).await?;

    ctx.say(format!(
        "✅ Access panel posted. The button now grants the `{}` role.",
        role.name
    ))
    .await?;
    Ok(())
}
