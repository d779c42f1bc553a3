//! Implements the `/com` command.
//!
//! Flips the commissions status by renaming the status channel, then
//! refreshes the welcome embed so both surfaces agree.

use tracing::instrument;

use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::welcome::CommsStatus;
use crate::Context;

/// The status to set.
#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum StatusChoice {
    #[name = "Open"]
    Open,
    #[name = "Closed"]
    Closed,
}

impl From<StatusChoice> for CommsStatus {
    fn from(choice: StatusChoice) -> Self {
        match choice {
            StatusChoice::Open => CommsStatus::Open,
            StatusChoice::Closed => CommsStatus::Closed,
        }
    }
}

/// Set the commissions status
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn com(
    ctx: Context<'_>,
    #[description = "The status to set"] status: StatusChoice,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let settings = ctx.data().settings.get().await;
    let channel_id = settings
        .channels
        .comms_status
        .ok_or(UserError::CommsChannelNotConfigured)?;

    let status = CommsStatus::from(status);
    let new_name = status.channel_name();

    // A permission failure here surfaces through the framework handler with
    // the Manage Channels hint.
    channel_id
        .edit(ctx, serenity::EditChannel::new().name(new_name))
        .await?;

    if let Err(err) =
        crate::welcome::update_welcome(ctx.serenity_context(), ctx.data(), status).await
    {
        tracing::error!("Welcome embed refresh after /com failed: {err}");
    }

    ctx.say(format!(
        "The channel name has been updated to: **{new_name}**. \
         The welcome embed has been updated automatically."
    ))
    .await?;
    Ok(())
}
