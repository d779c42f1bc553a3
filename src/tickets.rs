//! The ticket workflow. Every transition is driven by a button:
//! create → request close (support role) → confirm or cancel.
//!
//! All mutations return an explicit `Result`; the event dispatcher decides
//! what is surfaced to the member and what is merely logged.

use crate::data::tickets::TicketConfig;
use crate::data::Data;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::serenity::Mentionable;

/// Button ids driving the workflow.
pub const CREATE_TICKET: &str = "create_ticket";
pub const CLOSE_TICKET_REQUEST: &str = "close_ticket_request";
pub const CONFIRM_CLOSE_TICKET: &str = "confirm_close_ticket";
pub const CANCEL_CLOSE_TICKET: &str = "cancel_close_ticket";

/// Channel name prefix; one ticket per user is enforced through it.
const NAME_PREFIX: &str = "ticket-";

/// Hard cap on transcript length, in messages.
const TRANSCRIPT_LIMIT: usize = 500;

/// The channel name a user's ticket gets by convention.
pub fn channel_name_for(user: &serenity::User) -> String {
    format!("{NAME_PREFIX}{}", user.name.to_lowercase())
}

/// Whether a channel name follows the ticket convention.
pub fn is_ticket_channel(name: &str) -> bool {
    name.starts_with(NAME_PREFIX)
}

/// Button press `create_ticket`: provisions the private support channel.
pub async fn create(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    let config = data
        .tickets
        .get()
        .await
        .ok_or(UserError::TicketsNotConfigured)?;
    let guild_id = interaction.guild_id.ok_or(UserError::NotInGuild)?;

    let name = channel_name_for(&interaction.user);

    // One ticket per user: reject while a channel with this name exists.
    let channels = guild_id.channels(ctx).await?;
    if channels
        .values()
        .any(|c| c.name.eq_ignore_ascii_case(&name))
    {
        return Err(UserError::TicketAlreadyOpen.into());
    }

    // The configured category must still exist and be a category.
    let category = config.category_id.to_channel(ctx).await.ok();
    let category = category
        .and_then(serenity::Channel::guild)
        .filter(|c| c.kind == serenity::ChannelType::Category)
        .ok_or(UserError::TicketCategoryMisconfigured)?;

    let permissions = vec![
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::VIEW_CHANNEL,
            kind: serenity::PermissionOverwriteType::Role(guild_id.everyone_role()),
        },
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::VIEW_CHANNEL
                | serenity::Permissions::SEND_MESSAGES
                | serenity::Permissions::READ_MESSAGE_HISTORY
                | serenity::Permissions::ATTACH_FILES,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Member(interaction.user.id),
        },
        serenity::PermissionOverwrite {
            allow: serenity::Permissions::VIEW_CHANNEL
                | serenity::Permissions::SEND_MESSAGES
                | serenity::Permissions::READ_MESSAGE_HISTORY
                | serenity::Permissions::MANAGE_MESSAGES
                | serenity::Permissions::ATTACH_FILES,
            deny: serenity::Permissions::empty(),
            kind: serenity::PermissionOverwriteType::Role(config.support_role_id),
        },
    ];

    let builder = serenity::CreateChannel::new(name.as_str())
        .kind(serenity::ChannelType::Text)
        .category(category.id)
        .permissions(permissions);

    let channel = match guild_id.create_channel(ctx, builder).await {
        Ok(channel) => channel,
        Err(err) => {
            tracing::error!("Ticket channel creation failed: {err}");
            return Err(UserError::BotCannotManageChannels.into());
        }
    };

    let intro = serenity::CreateEmbed::new()
        .title(format!("Ticket from {}", interaction.user.name))
        .description(
            "Welcome to your ticket. Support will be with you shortly. \
             Please describe your request in detail.",
        )
        .color(0x3498DB)
        .timestamp(serenity::Timestamp::now());

    let close_row = serenity::CreateActionRow::Buttons(vec![serenity::CreateButton::new(
        CLOSE_TICKET_REQUEST,
    )
    .label("Close Ticket")
    .style(serenity::ButtonStyle::Danger)]);

    let message = serenity::CreateMessage::new()
        .content(format!(
            "👋 Hello {}, {} will be with you soon.",
            interaction.user.id.mention(),
            config.support_role_id.mention(),
        ))
        .embed(intro)
        .components(vec![close_row]);
    channel.send_message(ctx, message).await?;

    respond_ephemeral(
        ctx,
        interaction,
        format!("Your ticket has been created: {}", channel.mention()),
    )
    .await
}

/// Button press `close_ticket_request`: support role asks for confirmation.
pub async fn request_close(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    let config = data
        .tickets
        .get()
        .await
        .ok_or(UserError::TicketsNotConfigured)?;
    if !has_support_role(interaction, &config) {
        return Err(UserError::NotSupportRole.into());
    }

    let confirmation = serenity::CreateEmbed::new()
        .title("Confirmation")
        .description(
            "Are you sure you want to close this ticket? This action cannot be undone.",
        )
        .color(0xF1C40F);

    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(CONFIRM_CLOSE_TICKET)
            .label("Confirm Close")
            .style(serenity::ButtonStyle::Danger),
        serenity::CreateButton::new(CANCEL_CLOSE_TICKET)
            .label("Cancel")
            .style(serenity::ButtonStyle::Secondary),
    ]);

    let response = serenity::CreateInteractionResponseMessage::new()
        .embed(confirmation)
        .components(vec![buttons]);
    interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}

/// Button press `confirm_close_ticket`: archive the transcript, then delete
/// the channel.
pub async fn confirm_close(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    let config = data
        .tickets
        .get()
        .await
        .ok_or(UserError::TicketsNotConfigured)?;
    // Permission was checked when the prompt was posted; stay silent here.
    if !has_support_role(interaction, &config) {
        return Ok(());
    }

    let response = serenity::CreateInteractionResponseMessage::new()
        .content("Saving transcript and closing ticket...")
        .embeds(Vec::new())
        .components(Vec::new());
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::UpdateMessage(response),
        )
        .await?;

    let channel_name = interaction
        .channel_id
        .name(ctx)
        .await
        .unwrap_or_else(|_| "ticket".to_string());

    if let Some(log_channel) = config.log_channel_id {
        match collect_messages(ctx, interaction.channel_id).await {
            Ok(messages) => {
                let html = render_transcript(&channel_name, &messages);
                let attachment = serenity::CreateAttachment::bytes(
                    html.into_bytes(),
                    format!("transcript-{channel_name}.html"),
                );
                let notice = serenity::CreateMessage::new()
                    .content(format!(
                        "Transcript for `{channel_name}` (Closed by {})",
                        interaction.user.name
                    ))
                    .add_file(attachment);
                if let Err(err) = log_channel.send_message(ctx, notice).await {
                    tracing::error!("Could not deliver ticket transcript: {err}");
                }
            }
            Err(err) => {
                tracing::error!("Could not collect ticket transcript: {err}");
            }
        }
    }

    interaction.channel_id.delete(ctx).await?;
    Ok(())
}

/// Button press `cancel_close_ticket`: discard the confirmation prompt.
pub async fn cancel_close(
    ctx: &serenity::Context,
    data: &Data,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), PrometheusError> {
    let config = data
        .tickets
        .get()
        .await
        .ok_or(UserError::TicketsNotConfigured)?;
    if !has_support_role(interaction, &config) {
        return Ok(());
    }

    interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Acknowledge)
        .await?;
    interaction.message.delete(ctx).await?;
    Ok(())
}

/// Whether the pressing member carries the configured support role.
fn has_support_role(
    interaction: &serenity::ComponentInteraction,
    config: &TicketConfig,
) -> bool {
    interaction
        .member
        .as_ref()
        .is_some_and(|m| m.roles.contains(&config.support_role_id))
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: String,
) -> Result<(), PrometheusError> {
    let response = serenity::CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Message(response))
        .await?;
    Ok(())
}

/// One rendered transcript line.
#[derive(Debug)]
pub struct TranscriptMessage {
    pub author: String,
    pub timestamp: String,
    pub content: String,
}

/// Pull the channel history (oldest first), bounded by [TRANSCRIPT_LIMIT].
async fn collect_messages(
    ctx: &serenity::Context,
    channel: serenity::ChannelId,
) -> Result<Vec<TranscriptMessage>, PrometheusError> {
    let mut collected: Vec<TranscriptMessage> = Vec::new();
    let mut before: Option<serenity::MessageId> = None;

    while collected.len() < TRANSCRIPT_LIMIT {
        let mut request = serenity::GetMessages::new().limit(100);
        if let Some(before_id) = before {
            request = request.before(before_id);
        }

        let page = channel.messages(ctx, request).await?;
        if page.is_empty() {
            break;
        }
        before = page.last().map(|m| m.id);

        for message in &page {
            let mut content = message.content.clone();
            for attachment in &message.attachments {
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(&format!("[attachment: {}]", attachment.filename));
            }
            collected.push(TranscriptMessage {
                author: message.author.name.clone(),
                timestamp: message.timestamp.to_string(),
                content,
            });
        }
    }

    collected.truncate(TRANSCRIPT_LIMIT);
    // Pages arrive newest first.
    collected.reverse();
    Ok(collected)
}

/// Renders the ticket history as a standalone HTML document.
pub fn render_transcript(channel_name: &str, messages: &[TranscriptMessage]) -> String {
    let mut body = String::new();
    for message in messages {
        body.push_str(&format!(
            "    <div class=\"msg\"><span class=\"author\">{}</span> \
             <span class=\"time\">{}</span><p>{}</p></div>\n",
            escape_html(&message.author),
            escape_html(&message.timestamp),
            escape_html(&message.content).replace('\n', "<br>"),
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Transcript — #{name}</title>\n\
         <style>\n\
         body {{ background: #313338; color: #dbdee1; font-family: sans-serif; }}\n\
         .msg {{ margin: 8px 0; }}\n\
         .author {{ font-weight: bold; color: #f2f3f5; }}\n\
         .time {{ color: #949ba4; font-size: 0.8em; margin-left: 6px; }}\n\
         p {{ margin: 2px 0 0; white-space: pre-wrap; }}\n\
         </style>\n</head>\n<body>\n  <h1>#{name}</h1>\n{body}</body>\n</html>\n",
        name = escape_html(channel_name),
        body = body,
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_names_are_lowercased_and_prefixed() {
        assert!(is_ticket_channel("ticket-kentiq"));
        assert!(!is_ticket_channel("general"));
    }

    #[test]
    fn transcript_escapes_markup_and_keeps_order() {
        let messages = vec![
            TranscriptMessage {
                author: "alice".to_string(),
                timestamp: "2025-01-01T10:00:00Z".to_string(),
                content: "first <script>alert(1)</script>".to_string(),
            },
            TranscriptMessage {
                author: "bob & co".to_string(),
                timestamp: "2025-01-01T10:05:00Z".to_string(),
                content: "second\nline".to_string(),
            },
        ];

        let html = render_transcript("ticket-alice", &messages);
        assert!(html.contains("#ticket-alice"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("bob &amp; co"));
        assert!(html.contains("second<br>line"));
        // alice's message renders before bob's.
        assert!(html.find("first").unwrap() < html.find("second").unwrap());
    }
}
