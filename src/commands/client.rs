//! Implements the `/client` command.

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::Context;

/// Discord caps embed field values at this length.
const MAX_FIELD_LENGTH: usize = 1024;

/// Present a client and the work delivered for them
#[instrument(skip(ctx, proof))]
#[poise::command(slash_command, guild_only)]
pub async fn client(
    ctx: Context<'_>,
    #[description = "ID of the client to present"]
    #[autocomplete = "commands::autocomplete_client"]
    id: String,
    #[description = "Proof of the work"] proof: Option<serenity::Attachment>,
) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    let catalogs = ctx.data().catalogs.get().await;
    let entry = catalogs
        .clients
        .get(&id)
        .ok_or_else(|| UserError::UnknownClient(id.clone()))?;

    let tasks = entry
        .tasks
        .split(',')
        .map(|t| format!("• {}", t.trim()))
        .join("\n");

    let mut embed = serenity::CreateEmbed::new()
        .title(format!("💼 {} — {}", entry.name.to_uppercase(), entry.role))
        .field("📝 Tasks Completed", tasks, false)
        .color(entry.color.unwrap_or(commands::BLUE))
        .footer(serenity::CreateEmbedFooter::new(
            "Prometheus • Client Showcase",
        ))
        .timestamp(serenity::Timestamp::now());

    // Long feedback quotes are chunked across continuation fields.
    if let Some(quote) = entry.quote.as_deref().filter(|q| !q.is_empty()) {
        let quote = format!("*“{quote}”*");
        let chars: Vec<char> = quote.chars().collect();
        for (index, chunk) in chars.chunks(MAX_FIELD_LENGTH).enumerate() {
            let name = if index == 0 {
                "💬 Client Feedback"
            } else {
                "\u{200B}"
            };
            embed = embed.field(name, chunk.iter().collect::<String>(), false);
        }
    }

    let mut reply = CreateReply::default();

    match (entry.proof.as_deref(), &proof) {
        (Some("attachment"), Some(attachment)) => {
            let file = serenity::CreateAttachment::url(ctx.http(), &attachment.url).await?;
            reply = reply.attachment(file);
        }
        (Some(url), _) if url.starts_with("http") => {
            reply = reply.content(url.to_string());
        }
        _ => {}
    }

    ctx.send(reply.embed(embed)).await?;
    Ok(())
}
