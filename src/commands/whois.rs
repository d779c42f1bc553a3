//! Implements the `/whois` command.
//!
//! Displays a person's profile card, assembled from the identity catalog and
//! the profile sections of their presentation markdown.

use std::time::Duration;

use itertools::Itertools;
use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::error::UserError;
use crate::serenity;
use crate::welcome;
use crate::Context;

const BUILDUP_DELAY: Duration = Duration::from_millis(1500);

/// Display a person's profile card
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn whois(
    ctx: Context<'_>,
    #[description = "The person whose card to display"]
    #[autocomplete = "commands::autocomplete_identity"]
    person: String,
) -> Result<(), PrometheusError> {
    let catalogs = ctx.data().catalogs.get().await;
    let identity = catalogs
        .identities
        .get(&person)
        .ok_or_else(|| UserError::UnknownIdentity(person.clone()))?;

    // Dramatic access sequence before the card.
    let reply = ctx.say("```[ ACCESSING SUBJECT PROFILE... ]```").await?;
    tokio::time::sleep(BUILDUP_DELAY).await;

    reply
        .edit(
            ctx,
            CreateReply::default().content("```[ AUTHENTICATION... GRANTED. ]```"),
        )
        .await?;
    tokio::time::sleep(BUILDUP_DELAY).await;

    reply
        .edit(
            ctx,
            CreateReply::default().content(format!(
                "```[ LOADING DATA STREAM... SUBJECT: {} ]```",
                identity.name.to_uppercase()
            )),
        )
        .await?;
    tokio::time::sleep(Duration::from_millis(2000)).await;

    let presentation = identity.presentation_markdown.as_deref().unwrap_or("");
    let philosophy = extract_section(presentation, "Philosophy");
    let languages = extract_section(presentation, "Languages Spoken")
        .map(|section| section.lines().map(decorate_language_line).join("\n"));

    let mut title_embed = serenity::CreateEmbed::new()
        .title(format!(
            "〚⚜️〛 {} — {}",
            identity.name.to_uppercase(),
            identity.role
        ))
        .field(
            "\u{200B}",
            "A highly versatile Full-Stack developer specializing in comprehensive \
             polyvalence.",
            false,
        )
        .color(identity.color.unwrap_or(commands::ACCENT));
    if let Some(image) = &identity.image {
        title_embed = title_embed.thumbnail(image);
    }

    let mut embeds = vec![title_embed, welcome::spacer()];

    if let Some(philosophy) = philosophy {
        embeds.push(
            serenity::CreateEmbed::new()
                .field("〚💭〛 Philosophy", philosophy, false)
                .color(commands::ACCENT),
        );
        embeds.push(welcome::spacer());
    }

    if let Some(languages) = languages {
        embeds.push(
            serenity::CreateEmbed::new()
                .field("〚🌐〛 Languages Spoken", languages, false)
                .color(commands::ACCENT_ALT),
        );
        embeds.push(welcome::spacer());
    }

    let links: Vec<(&String, &String)> = identity
        .links
        .iter()
        .filter(|(_, url)| url.starts_with("http"))
        .collect();

    if !links.is_empty() {
        let links_text = links
            .iter()
            .map(|(key, url)| format!("> {}: [{key}]({url})", capitalize(key)))
            .join("\n");
        embeds.push(
            serenity::CreateEmbed::new()
                .field("〚🔗〛 Links", links_text, false)
                .color(commands::ACCENT_SOFT)
                .footer(serenity::CreateEmbedFooter::new(
                    "Prometheus • Identification Protocol",
                ))
                .timestamp(serenity::Timestamp::now()),
        );
    }

    let mut card = CreateReply::default().content("");
    for embed in embeds {
        card = card.embed(embed);
    }

    // Discord allows at most five link buttons per row.
    let buttons: Vec<serenity::CreateButton> = links
        .iter()
        .take(5)
        .map(|(key, url)| serenity::CreateButton::new_link(url.as_str()).label(capitalize(key)))
        .collect();
    if !buttons.is_empty() {
        card = card.components(vec![serenity::CreateActionRow::Buttons(buttons)]);
    }

    reply.edit(ctx, card).await?;
    Ok(())
}

/// Extracts the body of the `###` section whose heading contains `keyword`,
/// stopping at the next heading or a `---` rule.
fn extract_section(markdown: &str, keyword: &str) -> Option<String> {
    let mut in_section = false;
    let mut collected: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("###") {
            if in_section {
                break;
            }
            in_section = trimmed.contains(keyword);
            continue;
        }
        if in_section {
            if trimmed == "---" {
                break;
            }
            collected.push(line);
        }
    }

    let text = collected.join("\n").trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Brackets a leading flag emoji (two regional indicators) the way the
/// server's channel names do.
fn decorate_language_line(line: &str) -> String {
    let mut chars = line.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if is_regional_indicator(a) && is_regional_indicator(b) => {
            format!("〚{a}{b}〛{}", chars.as_str())
        }
        _ => line.to_string(),
    }
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRESENTATION: &str = "\
## Profile

### 🌐 Languages Spoken

🇫🇷 French — native
🇬🇧 English — fluent

---

### 💭 Philosophy

> Build systems that outlive their authors.
> Ship less, polish more.
";

    #[test]
    fn extracts_sections_between_headings_and_rules() {
        let languages = extract_section(PRESENTATION, "Languages Spoken").unwrap();
        assert!(languages.contains("French"));
        assert!(!languages.contains("Philosophy"));

        let philosophy = extract_section(PRESENTATION, "Philosophy").unwrap();
        assert!(philosophy.starts_with("> Build systems"));
        assert!(philosophy.contains("polish more."));
    }

    #[test]
    fn missing_section_yields_none() {
        assert!(extract_section(PRESENTATION, "Noteworthy Projects").is_none());
        assert!(extract_section("", "Philosophy").is_none());
    }

    #[test]
    fn language_lines_get_their_flags_bracketed() {
        assert_eq!(
            decorate_language_line("🇫🇷 French — native"),
            "〚🇫🇷〛 French — native"
        );
        assert_eq!(decorate_language_line("plain line"), "plain line");
    }

    #[test]
    fn capitalize_handles_common_link_keys() {
        assert_eq!(capitalize("portfolio"), "Portfolio");
        assert_eq!(capitalize(""), "");
    }
}
