//! Implements the `/credits` command: a member's own view of their invite
//! count, tier and K-Credit balance.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Show your invite count and K-Credit balance
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn credits(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let data = ctx.data();
    let record = data.ledger.record_for(ctx.author().id).await;

    let summary = match &record {
        Some(record) => {
            let tier_name = record
                .tier_id
                .as_deref()
                .and_then(|id| data.ledger.tiers().iter().find(|t| t.id == id))
                .map_or("no tier yet".to_string(), |t| t.display_name.clone());
            format!(
                "**Invites:** {}\n**K-Credits:** {:.2}\n**Tier:** {tier_name}",
                record.invites, record.reward_balance
            )
        }
        None => "You have no credited invites yet. Invite someone to start earning \
                 K-Credits!"
            .to_string(),
    };

    let tier_table = data
        .ledger
        .tiers()
        .iter()
        .map(|tier| {
            format!(
                "• **{}** — {}+ invites, ×{:.2} reward",
                tier.display_name, tier.min_invites, tier.multiplier
            )
        })
        .join("\n");

    let embed = serenity::CreateEmbed::new()
        .title("📨 Your Invite Credits")
        .description(summary)
        .field(
            "Reward tiers",
            format!(
                "Base reward: {:.2} K-Credits per invite\n{tier_table}",
                data.ledger.base_reward()
            ),
            false,
        )
        .color(commands::GREEN)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Invite Program",
        ))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
