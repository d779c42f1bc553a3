//! The welcome embed: a webhook-owned message sequence in the welcome
//! channel that carries the live commissions status. `/setup-welcome`
//! provisions it, `/com` and startup refresh it.

use crate::data::Data;
use crate::error::PrometheusError;
use crate::serenity;

/// Name of the webhook `/setup-welcome` provisions.
pub const WEBHOOK_NAME: &str = "Kentiq Welcome";

/// Username the webhook posts under.
const WEBHOOK_USERNAME: &str = "Kentiq Universe";

/// Separator embed color (matches the Discord dark theme background).
pub const SPACER_COLOR: u32 = 0x2F3136;

const ACCENT: u32 = 0x5865F2;
const ACCENT_ALT: u32 = 0x5B6EE8;
const ACCENT_SOFT: u32 = 0x6077DE;
const OPEN_COLOR: u32 = 0x2ECC71;
const CLOSED_COLOR: u32 = 0xE74C3C;

/// Commissions availability, read from the status channel's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsStatus {
    Open,
    Closed,
}

impl CommsStatus {
    pub fn emoji(self) -> &'static str {
        match self {
            CommsStatus::Open => "🟢",
            CommsStatus::Closed => "🔴",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommsStatus::Open => "Open",
            CommsStatus::Closed => "Closed",
        }
    }

    /// The name carried by the status channel for this state.
    pub fn channel_name(self) -> &'static str {
        match self {
            CommsStatus::Open => "〚🟢〛Comms : Open",
            CommsStatus::Closed => "〚🔴〛Comms : Closed",
        }
    }
}

impl std::fmt::Display for CommsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommsStatus::Open => "open",
            CommsStatus::Closed => "closed",
        })
    }
}

/// Detects the current commissions status by reading the status channel's
/// name. Anything unreadable counts as closed.
pub async fn comms_status(
    http: impl AsRef<serenity::Http>,
    channel: Option<serenity::ChannelId>,
) -> CommsStatus {
    let Some(channel_id) = channel else {
        return CommsStatus::Closed;
    };

    match channel_id.to_channel(http.as_ref()).await {
        Ok(channel) => match channel.guild() {
            Some(channel) if channel.name.to_lowercase().contains("open") => CommsStatus::Open,
            _ => CommsStatus::Closed,
        },
        Err(err) => {
            tracing::error!("Error getting comms status: {err}");
            CommsStatus::Closed
        }
    }
}

/// A zero-width separator embed.
pub fn spacer() -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .description("\u{200B}")
        .color(SPACER_COLOR)
}

/// The full welcome sequence with the commissions status baked in.
pub fn welcome_embeds(status: CommsStatus) -> Vec<serenity::CreateEmbed> {
    let is_open = status == CommsStatus::Open;

    let header = serenity::CreateEmbed::new()
        .author(serenity::CreateEmbedAuthor::new(
            "〚✨〛 Welcome to Kentiq Universe",
        ))
        .title(
            "Hello! Welcome to my digital workspace where I showcase my work, \
             collaborate with teams, and share insights about Roblox development.",
        )
        .color(ACCENT);

    let contents = serenity::CreateEmbed::new()
        .field(
            "What you'll find here:",
            "• 〚📦〛 Kentiq Area — Explore my latest projects and assets\n\
             • 〚🤝〛 Work-with — See the teams I work with\n\
             • 〚🎫〛 Tickets — Open a ticket for my development services",
            false,
        )
        .color(ACCENT_ALT);

    let quick_links = serenity::CreateEmbed::new()
        .field(
            "〚🔗〛 Quick Links",
            "> Portal: [kentiq.tech/portal](https://www.kentiq.tech/portal)\n\
             > Portfolio: [kentiq.tech/portfolio](https://www.kentiq.tech/portfolio)\n\
             > Services: [kentiq.tech/home](https://www.kentiq.tech/home)",
            false,
        )
        .color(ACCENT_SOFT);

    let status_embed = serenity::CreateEmbed::new()
        .field(
            "〚💼〛 Commissions Status",
            format!("〚{}〛 {}", status.emoji(), status.label()),
            false,
        )
        .color(if is_open { OPEN_COLOR } else { CLOSED_COLOR })
        .footer(serenity::CreateEmbedFooter::new("Kentiq Universe"))
        .timestamp(serenity::Timestamp::now());

    let confirmation = serenity::CreateEmbed::new()
        .description(
            "Use the access panel below to confirm you have read this message \
             and unlock the rest of the server.",
        )
        .color(ACCENT);

    vec![
        header,
        spacer(),
        contents,
        spacer(),
        quick_links,
        spacer(),
        status_embed,
        spacer(),
        confirmation,
    ]
}

/// Edits the welcome message through its webhook, or posts it when no
/// message exists yet (saving the new pointer). A missing webhook
/// configuration is a warning, never an error: this is cosmetic surface.
pub async fn update_welcome(
    ctx: &serenity::Context,
    data: &Data,
    status: CommsStatus,
) -> Result<(), PrometheusError> {
    let settings = data.settings.get().await;
    let Some(binding) = settings.webhooks.welcome.clone() else {
        tracing::warn!("Welcome webhook not configured. Skipping update.");
        return Ok(());
    };

    let webhook =
        serenity::Webhook::from_id_with_token(ctx, binding.id, &binding.token).await?;
    let embeds = welcome_embeds(status);

    if let Some(message_id) = binding.message_id {
        let builder = serenity::EditWebhookMessage::new().embeds(embeds);
        webhook.edit_message(ctx, message_id, builder).await?;
        return Ok(());
    }

    // No message yet: post one and remember it for future edits.
    let builder = serenity::ExecuteWebhook::new()
        .username(WEBHOOK_USERNAME)
        .embeds(embeds);
    let posted = webhook.execute(ctx, true, builder).await?;

    if let Some(message) = posted {
        data.settings
            .update(|config| {
                if let Some(welcome) = config.webhooks.welcome.as_mut() {
                    welcome.message_id = Some(message.id);
                }
            })
            .await?;
    }

    Ok(())
}
