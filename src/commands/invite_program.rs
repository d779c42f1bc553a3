//! Implements the `/setup-invite-program` command.
//!
//! Binds the announcement channel and posts the tier panel. The tier table
//! itself is startup-static; changing it means editing config.json and
//! restarting.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::Context;

/// Configure the invite reward program
#[instrument(skip(ctx))]
#[poise::command(
    slash_command,
    guild_only,
    rename = "setup-invite-program",
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup_invite_program(
    ctx: Context<'_>,
    #[description = "Channel where credited invites are announced (defaults to here)"]
    #[channel_types("Text")]
    channel: Option<serenity::GuildChannel>,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let target = channel.map_or_else(|| ctx.channel_id(), |c| c.id);
    ctx.data()
        .settings
        .update(|config| {
            config.invite_program.announce_channel = Some(target);
        })
        .await?;

    let ledger = &ctx.data().ledger;
    let tier_table = ledger
        .tiers()
        .iter()
        .map(|tier| {
            format!(
                "• **{}** — {}+ invites, ×{:.2} reward",
                tier.display_name, tier.min_invites, tier.multiplier
            )
        })
        .join("\n");

    let panel = serenity::CreateEmbed::new()
        .title("📨 Invite Reward Program")
        .description(
            "Invite your friends to the server and earn K-Credits for every member \
             who joins through your link. Reaching a tier raises your reward \
             multiplier. Check your balance anytime with `/credits`.",
        )
        .field(
            "Rewards",
            format!(
                "Base reward: {:.2} K-Credits per invite\n{tier_table}",
                ledger.base_reward()
            ),
            false,
        )
        .color(commands::GREEN)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Invite Program",
        ))
        .timestamp(serenity::Timestamp::now());

    let message = serenity::CreateMessage::new().embed(panel);
    target.send_message(ctx, message).await?;

    ctx.send(
        CreateReply::default()
            .content(format!(
                "✅ Invite program configured. Credited invites will be announced in {}.",
                target.mention()
            ))
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
