//! Implements the `/stats` command.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// Display bot and server statistics
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn stats(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    // Read everything out of the cache before further awaits; cache guards
    // must not be held across suspension points.
    let (guild_name, member_count, channel_count) = {
        let guild = ctx.guild().ok_or(UserError::GuildOnly)?;
        (
            guild.name.clone(),
            guild.member_count,
            guild.channels.len(),
        )
    };
    let (bot_name, bot_id) = {
        let user = ctx.cache().current_user();
        (user.name.clone(), user.id)
    };

    let uptime = ctx.data().started.elapsed();
    let catalogs = ctx.data().catalogs.get().await;
    let ledger_size = ctx.data().ledger.len().await;
    let latency = ctx.ping().await;

    let embed = serenity::CreateEmbed::new()
        .title("📊 Prometheus Statistics")
        .field(
            "🤖 Bot",
            format!(
                "**Name:** {bot_name}\n**ID:** {bot_id}\n**Version:** {}",
                env!("CARGO_PKG_VERSION")
            ),
            true,
        )
        .field(
            "🌐 Server",
            format!(
                "**Name:** {guild_name}\n**Members:** {member_count}\n**Channels:** {channel_count}"
            ),
            true,
        )
        .field("⏱️ Uptime", format_uptime(uptime.as_secs()), false)
        .field(
            "📦 Archives",
            format!(
                "**Assets:** {}\n**Clients:** {}\n**Collabs:** {}\n**Identities:** {}\n\
                 **Invite ledger:** {ledger_size}",
                catalogs.assets.len(),
                catalogs.clients.len(),
                catalogs.collabs.len(),
                catalogs.identities.len(),
            ),
            true,
        )
        .field("🌐 Latency", format!("{}ms", latency.as_millis()), true)
        .color(commands::CYAN)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • System Statistics",
        ))
        .timestamp(serenity::Timestamp::now());

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// `86461s` -> `1d 0h 1m 1s`
fn format_uptime(total_secs: u64) -> String {
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::format_uptime;

    #[test]
    fn uptime_splits_into_units() {
        assert_eq!(format_uptime(0), "0d 0h 0m 0s");
        assert_eq!(format_uptime(59), "0d 0h 0m 59s");
        assert_eq!(format_uptime(86_461), "1d 0h 1m 1s");
        assert_eq!(format_uptime(3 * 86_400 + 2 * 3_600 + 5), "3d 2h 0m 5s");
    }
}
