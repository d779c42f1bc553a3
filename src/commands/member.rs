//! Implements the `/member` command: an administrator's view of one member,
//! including their row in the invite ledger.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::Context;

/// Inspect a member of the community
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn member(
    ctx: Context<'_>,
    #[description = "The member to inspect"] user: serenity::User,
) -> Result<(), PrometheusError> {
    ctx.defer_ephemeral().await?;

    let guild_id = ctx.guild_id().ok_or(crate::error::UserError::GuildOnly)?;
    let member = guild_id.member(ctx, user.id).await?;

    let roles = member
        .roles
        .iter()
        .map(|role| role.mention().to_string())
        .join(" ");
    let roles = if roles.is_empty() {
        "*None*".to_string()
    } else {
        roles
    };

    let joined = member
        .joined_at
        .map_or("unknown".to_string(), |at| {
            format!("<t:{}:F>", at.unix_timestamp())
        });
    let created = format!("<t:{}:F>", user.created_at().unix_timestamp());

    let ledger_line = match ctx.data().ledger.record_for(user.id).await {
        Some(record) => {
            let tier = record.tier_id.as_deref().unwrap_or("none");
            format!(
                "**Invites:** {}\n**K-Credits:** {:.2}\n**Tier:** {tier}",
                record.invites, record.reward_balance
            )
        }
        None => "*No invites credited yet.*".to_string(),
    };

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("👤 {}", user.name))
        .field("Mention", user.id.mention().to_string(), true)
        .field("Account created", created, true)
        .field("Joined server", joined, true)
        .field("Roles", roles, false)
        .field("📨 Invite program", ledger_line, false)
        .color(commands::ACCENT)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Member Inspection",
        ))
        .timestamp(serenity::Timestamp::now());
    if let Some(avatar) = user.avatar_url() {
        embed = embed.thumbnail(avatar);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
