//! Implements the `/rules` command.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Display the server rules
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn rules(ctx: Context<'_>) -> Result<(), PrometheusError> {
    let embed = serenity::CreateEmbed::new()
        .title("〚📜〛 Server Rules")
        .description(
            "Please read and follow these rules to ensure a positive experience for everyone.",
        )
        .field(
            "1. Respect",
            "Be respectful to all members. Harassment, discrimination, or hate speech \
             will not be tolerated.",
            false,
        )
        .field(
            "2. No Spam",
            "Avoid spamming messages, emojis, or reactions. Keep conversations \
             meaningful and on-topic.",
            false,
        )
        .field(
            "3. Appropriate Content",
            "Keep all content appropriate for all ages. NSFW content is strictly \
             prohibited.",
            false,
        )
        .field(
            "4. No Self-Promotion",
            "Do not promote your own content, services, or servers without permission \
             from staff.",
            false,
        )
        .field(
            "5. Follow Discord ToS",
            "All Discord Terms of Service and Community Guidelines apply here.",
            false,
        )
        .field(
            "6. Business Inquiries",
            "For business inquiries or project requests, you can use the ticket system \
             or DM me directly. Tickets help me stay organized, but DMs are also \
             welcome.",
            false,
        )
        .field(
            "7. Responsibility & Information",
            "By using this server, you acknowledge that you have read and understood the \
             Rules, payment information (`/payment`), and skill descriptions. Failure to \
             read these documents does not exempt you from their terms. All information \
             provided in official channels (Rules, Pricing, Skills) is binding.",
            false,
        )
        .color(commands::ACCENT)
        .footer(serenity::CreateEmbedFooter::new("Kentiq Universe • Rules"))
        .timestamp(serenity::Timestamp::now());

    // Public on purpose, so the rules can be pointed at.
    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
