//! Implements the `/setup-welcome` command.
//!
//! Provisions (or reuses) the welcome webhook in the target channel, posts
//! the welcome sequence and stores the credentials for future refreshes.

use secrecy::ExposeSecret;
use tracing::instrument;

use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::setup::WelcomeWebhook;
use crate::welcome;
use crate::Context;

/// Set up the welcome embed with automatic commission status updates
#[instrument(skip(ctx))]
#[poise::command(
    slash_command,
    guild_only,
    rename = "setup-welcome",
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup_welcome(
    ctx: Context<'_>,
    #[description = "Channel where the welcome embed will be posted"]
    #[channel_types("Text", "News")]
    channel: serenity::GuildChannel,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    if !matches!(
        channel.kind,
        serenity::ChannelType::Text | serenity::ChannelType::News
    ) {
        return Err(UserError::NotATextChannel.into());
    }

    // Reuse the bot's webhook when one already exists in this channel.
    let existing = channel
        .id
        .webhooks(ctx)
        .await?
        .into_iter()
        .find(|hook| hook.name.as_deref() == Some(welcome::WEBHOOK_NAME));

    let webhook = match existing {
        Some(webhook) => webhook,
        None => {
            let builder = serenity::CreateWebhook::new(welcome::WEBHOOK_NAME);
            channel.id.create_webhook(ctx, builder).await?
        }
    };

    let token = webhook
        .token
        .clone()
        .ok_or_else(|| PrometheusError::ConfigError(crate::error::ConfigError::InvalidConfig {
            reason: "webhook came back without a token".to_string(),
        }))?;

    // Persist the credentials; the message pointer follows once posted.
    ctx.data()
        .settings
        .update(|config| {
            config.webhooks.welcome = Some(WelcomeWebhook {
                id: webhook.id,
                token: token.expose_secret().clone(),
                message_id: None,
            });
            config.channels.welcome = Some(channel.id);
        })
        .await?;

    // Post the sequence with the live status and remember the message.
    let settings = ctx.data().settings.get().await;
    let status = welcome::comms_status(ctx.http(), settings.channels.comms_status).await;
    welcome::update_welcome(ctx.serenity_context(), ctx.data(), status).await?;

    ctx.say(format!(
        "✅ Welcome embed configured successfully in {}! The embed will automatically \
         update when you change the commissions status with `/com`.",
        channel.mention()
    ))
    .await?;
    Ok(())
}
