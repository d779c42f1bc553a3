//! Gateway event handling outside the slash-command path: button
//! interactions, member joins (invite attribution + welcome DM), and
//! invite-cache upkeep.

use crate::data::Data;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::tickets;

/// Button id for the access panel posted by `/setup-access`.
pub const GRANT_ACCESS: &str = "grant_access";

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, PrometheusError>,
    data: &Data,
) -> Result<(), PrometheusError> {
    match event {
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            member_joined(ctx, data, new_member).await
        }
        serenity::FullEvent::InviteCreate { .. } | serenity::FullEvent::InviteDelete { .. } => {
            refresh_invite_cache(ctx, data).await;
            Ok(())
        }
        serenity::FullEvent::InteractionCreate {
            interaction: serenity::Interaction::Component(component),
        } => component_pressed(ctx, data, component).await,
        _ => Ok(()),
    }
}

/// Routes a button press. Expected refusals ([UserError]) are answered
/// ephemerally here; real failures propagate to the framework logger after
/// the member got a generic apology.
async fn component_pressed(
    ctx: &serenity::Context,
    data: &Data,
    component: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    // Buttons count against the same fixed window as commands.
    let is_admin = component
        .member
        .as_ref()
        .and_then(|m| m.permissions)
        .is_some_and(|p| p.administrator());
    if !is_admin && !data.rate_limiter.check(component.user.id).await {
        reply_ephemeral(ctx, component, UserError::RateLimited.to_string()).await;
        return Ok(());
    }

    let outcome = match component.data.custom_id.as_str() {
        tickets::CREATE_TICKET => tickets::create(ctx, data, component).await,
        tickets::CLOSE_TICKET_REQUEST => tickets::request_close(ctx, data, component).await,
        tickets::CONFIRM_CLOSE_TICKET => tickets::confirm_close(ctx, data, component).await,
        tickets::CANCEL_CLOSE_TICKET => tickets::cancel_close(ctx, data, component).await,
        GRANT_ACCESS => grant_access(ctx, data, component).await,
        _ => Ok(()),
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(PrometheusError::UserError(refusal)) => {
            reply_ephemeral(ctx, component, refusal.to_string()).await;
            Ok(())
        }
        Err(err) => {
            reply_ephemeral(
                ctx,
                component,
                "❌ An error occurred while processing this interaction.".to_string(),
            )
            .await;
            Err(err)
        }
    }
}

/// Grants the configured access role. The grant result is reported
/// explicitly; a failed role mutation is surfaced, not swallowed.
async fn grant_access(
    ctx: &serenity::Context,
    data: &Data,
    component: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    let settings = data.settings.get().await;
    let Some(role_id) = settings.access.role_id else {
        reply_ephemeral(
            ctx,
            component,
            "⚠️ The access role is not configured. Please contact an admin.".to_string(),
        )
        .await;
        return Ok(());
    };

    let Some(member) = component.member.as_ref() else {
        return Err(UserError::NotInGuild.into());
    };

    if member.roles.contains(&role_id) {
        reply_ephemeral(
            ctx,
            component,
            "You already have access. Enjoy your stay!".to_string(),
        )
        .await;
        return Ok(());
    }

    match member.add_role(ctx, role_id).await {
        Ok(()) => {
            reply_ephemeral(
                ctx,
                component,
                format!("✅ Access granted — welcome, {}!", component.user.name),
            )
            .await;
            Ok(())
        }
        Err(err) => {
            tracing::error!("Failed to grant access role {role_id}: {err}");
            reply_ephemeral(
                ctx,
                component,
                "❌ I could not assign the access role. Please contact an admin \
                 (check my `Manage Roles` permission)."
                    .to_string(),
            )
            .await;
            Ok(())
        }
    }
}

/// New member: attribute the consumed invite link, credit the referrer, and
/// send the welcome DM. Every step is best effort.
async fn member_joined(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> Result<(), PrometheusError> {
    if member.user.bot {
        return Ok(());
    }

    if let Some(referrer) = detect_referrer(ctx, data, member).await {
        let record = data.ledger.credit_invite(referrer).await;
        tracing::info!(
            "Credited invite: {referrer} now has {} invites ({:.2} K-Credits)",
            record.invites,
            record.reward_balance,
        );
        announce_credit(ctx, data, member, referrer, &record).await;
    }

    send_welcome_dm(ctx, data, member).await;
    Ok(())
}

/// Fetch the guild invites and diff them against the snapshot.
async fn detect_referrer(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
) -> Option<serenity::UserId> {
    let invites = match data.env.guild_id.invites(ctx).await {
        Ok(invites) => invites,
        Err(err) => {
            tracing::warn!("Could not fetch invites for join attribution: {err}");
            return None;
        }
    };

    let fresh = invites.into_iter().map(|inv| {
        let inviter = inv.inviter.as_ref().filter(|u| !u.bot).map(|u| u.id);
        (inv.code, inviter, inv.uses)
    });

    let referrer = data.invite_uses.lock().await.detect_consumed(fresh);
    // Self-invites earn nothing.
    referrer.filter(|id| *id != member.user.id)
}

/// Post the credit notice into the invite-program channel, when bound.
async fn announce_credit(
    ctx: &serenity::Context,
    data: &Data,
    member: &serenity::Member,
    referrer: serenity::UserId,
    record: &crate::data::invites::InviteRecord,
) {
    let settings = data.settings.get().await;
    let Some(channel) = settings.invite_program.announce_channel else {
        return;
    };

    let tier_line = record
        .tier_id
        .as_deref()
        .and_then(|id| {
            settings
                .invite_program
                .tiers
                .iter()
                .find(|t| t.id == id)
        })
        .map_or_else(
            || "below the first tier".to_string(),
            |t| format!("tier **{}**", t.display_name),
        );

    let embed = serenity::CreateEmbed::new()
        .title("📨 Invite credited")
        .description(format!(
            "{} joined using an invite from {}.",
            member.user.id.mention(),
            referrer.mention(),
        ))
        .field("Invites", record.invites.to_string(), true)
        .field(
            "K-Credits",
            format!("{:.2}", record.reward_balance),
            true,
        )
        .field("Tier", tier_line, true)
        .color(0x2ECC71)
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Invite Program",
        ))
        .timestamp(serenity::Timestamp::now());

    let message = serenity::CreateMessage::new().embed(embed);
    if let Err(err) = channel.send_message(ctx, message).await {
        tracing::error!("Could not announce invite credit: {err}");
    }
}

/// The orientation DM every (non-bot) new member receives. Disabled DMs are
/// expected and only logged.
async fn send_welcome_dm(ctx: &serenity::Context, data: &Data, member: &serenity::Member) {
    let settings = data.settings.get().await;
    let channels = &settings.channels;

    let channel_line = |binding: Option<serenity::ChannelId>, fallback: &str| {
        binding.map_or_else(|| fallback.to_string(), |id| id.mention().to_string())
    };

    let embed = serenity::CreateEmbed::new()
        .title("👋 Welcome to **Kentiq Universe**")
        .description("Here's everything you need to know to get started:")
        .field(
            "📜 Rules",
            format!(
                "Read the server rules: {}",
                channel_line(channels.rules, "see the rules channel")
            ),
            false,
        )
        .field(
            "💰 Payment Information",
            format!(
                "Payment terms & billing info: {}",
                channel_line(channels.payment, "see the payment channel")
            ),
            false,
        )
        .field(
            "📂 Skills & Expertise",
            format!(
                "Discover my full skillset: {}",
                channel_line(channels.skills, "see the skills channel")
            ),
            false,
        )
        .field(
            "🎫 Tickets",
            format!(
                "For commissions or project requests, open a ticket in {}",
                channel_line(channels.setup_tickets, "the tickets channel")
            ),
            false,
        )
        .field(
            '\u{200B}'.to_string(),
            "This server acts as my official workspace and portfolio hub.\n\n\
             Feel free to explore, ask questions, or just look around.",
            false,
        )
        .color(0x5865F2)
        .footer(serenity::CreateEmbedFooter::new(
            "Kentiq Universe • Welcome",
        ))
        .timestamp(serenity::Timestamp::now());

    let message = serenity::CreateMessage::new().embed(embed);
    if let Err(err) = member.user.direct_message(ctx, message).await {
        tracing::warn!(
            "Could not send welcome DM to {}: DMs may be disabled ({err})",
            member.user.name
        );
    }
}

/// Rebuild the invite-use snapshot after invite churn, so the next join
/// diffs against current counts.
async fn refresh_invite_cache(ctx: &serenity::Context, data: &Data) {
    match data.env.guild_id.invites(ctx).await {
        Ok(invites) => {
            let fresh = invites
                .into_iter()
                .map(|inv| (inv.code, inv.inviter.map(|u| u.id), inv.uses));
            data.invite_uses.lock().await.rebuild(fresh);
        }
        Err(err) => {
            tracing::warn!("Could not refresh invite cache: {err}");
        }
    }
}

async fn reply_ephemeral(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: String,
) {
    let response = serenity::CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    if let Err(err) = component
        .create_response(ctx, serenity::CreateInteractionResponse::Message(response))
        .await
    {
        tracing::error!("Failed to send ephemeral component reply: {err}");
    }
}
