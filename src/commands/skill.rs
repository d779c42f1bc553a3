//! Implements the `/skill` command.
//!
//! The skill showcase: category embeds, each followed by its image board
//! when the corresponding file exists under `config/images/`.

use poise::CreateReply;
use tracing::instrument;

use crate::commands;
use crate::error::PrometheusError;
use crate::serenity;
use crate::Context;

/// Showcase boards shipped alongside the configuration.
const BOARDS: [(&str, &str, u32); 4] = [
    ("〚💻〛 Applications I master", "Applications.png", commands::ACCENT),
    ("〚🛠️〛 Auxiliary Skills", "Auxiliary Skills.png", commands::ACCENT_ALT),
    ("〚⚙️〛 Frameworks", "Frameworks.png", commands::ACCENT_SOFT),
    ("〚🌐〛 Languages", "Languages.png", commands::ACCENT),
];

/// Display the skill showcase
#[instrument(skip(ctx))]
#[poise::command(slash_command)]
pub async fn skill(ctx: Context<'_>) -> Result<(), PrometheusError> {
    ctx.defer().await?;

    let images_dir = crate::setup::config_path("images");

    let mut reply = CreateReply::default();
    let mut any_board = false;

    // Two embeds per board keeps the message under Discord's ten-embed cap.
    for (index, (title, file, color)) in BOARDS.iter().enumerate() {
        let path = images_dir.join(*file);
        if !path.exists() {
            continue;
        }
        any_board = true;

        let mut header = serenity::CreateEmbed::new().title(*title).color(*color);
        if index == BOARDS.len() - 1 {
            header = header
                .footer(serenity::CreateEmbedFooter::new(
                    "Prometheus • Identification Protocol",
                ))
                .timestamp(serenity::Timestamp::now());
        }
        reply = reply.embed(header);

        reply = reply.embed(
            serenity::CreateEmbed::new()
                .image(format!("attachment://{file}"))
                .color(*color),
        );

        let attachment = serenity::CreateAttachment::path(&path).await?;
        reply = reply.attachment(attachment);
    }

    if !any_board {
        // No boards shipped: fall back to the textual skill overview.
        let embed = serenity::CreateEmbed::new()
            .title("〚📂〛 Skills & Expertise")
            .field(
                "💻 Code & System Architecture",
                "Custom frameworks, backend logic, performance optimization, API integration.",
                false,
            )
            .field(
                "📐 Models & Asset Creation",
                "High-quality 3D modeling with performance-optimized pipelines.",
                false,
            )
            .field(
                "🎬 Animation & VFX",
                "Character animation, cinematic sequences, custom visual effects.",
                false,
            )
            .field(
                "🎧 SFX & Audio Design",
                "Immersive soundscapes and custom sound effects.",
                false,
            )
            .field(
                "🎨 UX-UI & Graphics",
                "Intuitive interfaces, branding and visual identity.",
                false,
            )
            .field(
                "🌐 Web Development",
                "Dashboards and game management tools, front-end and back-end.",
                false,
            )
            .color(commands::ACCENT)
            .footer(serenity::CreateEmbedFooter::new(
                "Prometheus • Identification Protocol",
            ))
            .timestamp(serenity::Timestamp::now());
        reply = reply.embed(embed);
    }

    ctx.send(reply).await?;
    Ok(())
}
