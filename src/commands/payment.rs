//! Implements the `/payment` command: the official payment terms, as a
//! spaced multi-embed sequence.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::serenity::Mentionable;
use crate::welcome;
use crate::Context;

/// Display payment information and methods
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn payment(ctx: Context<'_>) -> Result<(), PrometheusError> {
    let settings = ctx.data().settings.get().await;
    let skills_line = settings.channels.skills.map_or_else(
        || "Want to know what my skills are? Use `/skill`.".to_string(),
        |id| format!("Want to know what my skills are? Click here: {}", id.mention()),
    );

    let title = serenity::CreateEmbed::new()
        .title("〚💰〛 Payment Information")
        .description("Official payment terms for all services and commissions.")
        .color(commands::ACCENT);

    let methods = serenity::CreateEmbed::new()
        .field(
            "〚💳〛 Accepted Payment Methods",
            "• PayPal (Friends & Family — recommended)\n\
             • Cryptocurrency\n\
             • Robux (Only for amounts > 100,000 Robux)",
            false,
        )
        .color(commands::ACCENT);

    let billing_modes = serenity::CreateEmbed::new()
        .field("〚🧠〛 Two Billing Modes Available", "\u{200B}", false)
        .color(commands::ACCENT);

    let consulting = serenity::CreateEmbed::new()
        .field(
            "1) Consulting — $90/hour (Full Flexibility)",
            "**Suitable for:**\n• Varied needs\n• Multiple tasks\n• Maintenance\n\
             • Adjustments\n• Continuous or evolving work\n\n\
             **Details:**\n• Minimum sessions: 1h\n\
             • Payment must be made within 3 days after the quote is issued. After 3 \
             days, the quote automatically expires.\n\
             • Upfront (40%) applies only to scope-based services, not consulting.\n\
             • Billing based on actual time spent",
            false,
        )
        .color(commands::ACCENT_ALT);

    let scope_based = serenity::CreateEmbed::new()
        .field(
            "2) Scope-Based Service — Fixed Price (Strict Scope)",
            "**Suitable for:**\n• Precise deliverables\n• Defined modules\n\
             • Complete systems with specifications\n\n\
             **Details:**\n• Scope defined BEFORE start\n\
             • No additions included outside scope\n\
             • Any extra = separate quote\n\
             • 40% upfront (non-refundable)\n\
             • 60% upon delivery",
            false,
        )
        .color(commands::ACCENT_SOFT);

    let security = serenity::CreateEmbed::new()
        .field(
            "〚🔒〛 Security Policy",
            "Once the service is delivered and validated, **no refunds** are \
             possible.\n\nThe initial payment (40%) is non-refundable, even if the \
             project is stopped, as it covers:\n• Slot reservation\n\
             • Preparation hours\n• Already produced elements",
            false,
        )
        .color(commands::ACCENT)
        .footer(serenity::CreateEmbedFooter::new(
            "Kentiq Universe • Payment Information",
        ))
        .timestamp(serenity::Timestamp::now());

    let skills = serenity::CreateEmbed::new()
        .description(skills_line)
        .color(commands::ACCENT);

    let mut reply = CreateReply::default();
    for embed in [
        title,
        welcome::spacer(),
        methods,
        welcome::spacer(),
        billing_modes,
        consulting,
        scope_based,
        welcome::spacer(),
        security,
        skills,
    ] {
        reply = reply.embed(embed);
    }

    ctx.send(reply).await?;
    Ok(())
}
